use anyhow::{Context, Result, anyhow};
use clap::Args;
use tracing::{info, warn};

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::adapter::ChainAdapter,
    commands::{connect, log_events, require_job},
    gateway::Gateway,
    types::{Job, JobId},
    utils::units::format_token,
    view::{JobAction, JobView},
};

/// Approve the escrow and deposit the job amount
#[derive(Args, Debug)]
pub struct FundArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    /// Submit even if the job does not look fundable from here
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn fund_job(args: FundArgs) -> Result<()> {
    info!("Starting job funding...");

    let (_, gateway) = connect(&args.network, &args.wallet, true)?;
    let job = fund(&gateway, args.job_id, args.force).await?;

    info!("Job {} is now {}", job.id, job.status);
    Ok(())
}

/// Runs the approve-then-fund sequence and returns the refreshed job.
pub async fn fund<A: ChainAdapter>(gateway: &Gateway<A>, id: JobId, force: bool) -> Result<Job> {
    let job = require_job(gateway, id).await?;
    let view = JobView::new(job.clone(), None, gateway.adapter().sender_address());
    if !view.offers(JobAction::Fund) {
        if !force {
            return Err(anyhow!(
                "Job {} is {} and cannot be funded by this wallet, pass --force to submit anyway",
                id,
                job.status
            ));
        }
        warn!(job_id = %id, status = %job.status, "Submitting fund despite job state");
    }

    let token = gateway
        .token_info_at(job.token)
        .await
        .context("Failed to read payment token")?;
    info!(
        "Funding job {} with {} {}",
        id,
        format_token(job.amount, token.decimals),
        token.symbol
    );

    let receipts = gateway
        .fund_job(id, job.token, job.amount, |stage| info!("Funding: {}", stage))
        .await
        .with_context(|| format!("Failed to fund job {id}"))?;
    log_events(gateway, &receipts.fund);

    require_job(gateway, id).await
}
