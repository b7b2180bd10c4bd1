use anyhow::{Result, anyhow};
use clap::Args;
use tracing::info;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    commands::{connect, require_job},
    types::JobId,
    view::{JobAction, JobView},
};

/// Express interest in a funded job
///
/// Applying is not recorded on-chain; the client assigns a freelancer
/// directly with `assign`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn apply_to_job(args: ApplyArgs) -> Result<()> {
    let (_, gateway) = connect(&args.network, &args.wallet, true)?;
    let job = require_job(&gateway, args.job_id).await?;
    let applicant = gateway.adapter().sender_address;

    let view = JobView::new(job, None, applicant);
    if !view.offers(JobAction::Apply) {
        return Err(anyhow!(
            "Job {} is {} and is not open for applications from this wallet",
            args.job_id,
            view.job.status
        ));
    }

    info!(
        "Share your address with the client of job {}: {}",
        args.job_id, view.job.client
    );
    if let Some(applicant) = applicant {
        info!(
            "The client can assign you with: escrow-jobs assign --job-id {} --freelancer {}",
            args.job_id, applicant
        );
    }

    Ok(())
}
