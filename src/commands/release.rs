use anyhow::{Context, Result, anyhow};
use clap::Args;
use tracing::{info, warn};

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::adapter::ChainAdapter,
    commands::{connect, log_events, require_job},
    gateway::Gateway,
    types::{Job, JobId},
    view::{JobAction, JobView},
};

/// Release the escrowed payment to the assigned freelancer
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    /// Submit even if the job does not look releasable from here
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn release_payment(args: ReleaseArgs) -> Result<()> {
    info!("Starting payment release...");

    let (_, gateway) = connect(&args.network, &args.wallet, true)?;
    let job = release(&gateway, args.job_id, args.force).await?;

    info!("Payment for job {} released to {}", job.id, job.freelancer);
    Ok(())
}

pub async fn release<A: ChainAdapter>(gateway: &Gateway<A>, id: JobId, force: bool) -> Result<Job> {
    let job = require_job(gateway, id).await?;
    let view = JobView::new(job.clone(), None, gateway.adapter().sender_address());
    if !view.offers(JobAction::Release) {
        if !force {
            return Err(anyhow!(
                "Job {} is {} and cannot be released by this wallet, pass --force to submit anyway",
                id,
                job.status
            ));
        }
        warn!(job_id = %id, status = %job.status, "Submitting release despite job state");
    }

    let pending = gateway
        .release_payment(id)
        .await
        .context("Failed to send release transaction")?;
    let receipt = gateway
        .confirm(&pending)
        .await
        .with_context(|| format!("Failed to release payment for job {id}"))?;
    log_events(gateway, &receipt);

    require_job(gateway, id).await
}
