use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use tracing::{info, warn};

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::adapter::ChainAdapter,
    commands::{connect, log_events, require_job},
    gateway::Gateway,
    lifecycle::JobStatus,
    types::{Job, JobId},
};

/// Assign a freelancer to a funded job
#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    /// Freelancer address
    #[arg(short, long, required = true)]
    freelancer: Address,

    /// Submit even if the job is not funded
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn assign_freelancer(args: AssignArgs) -> Result<()> {
    info!("Starting freelancer assignment...");

    let (_, gateway) = connect(&args.network, &args.wallet, true)?;
    let job = assign(&gateway, args.job_id, args.freelancer, args.force).await?;

    info!("Freelancer {} assigned to job {}", job.freelancer, job.id);
    Ok(())
}

pub async fn assign<A: ChainAdapter>(
    gateway: &Gateway<A>,
    id: JobId,
    freelancer: Address,
    force: bool,
) -> Result<Job> {
    if freelancer == Address::ZERO {
        return Err(anyhow!("Freelancer address must not be zero"));
    }

    let job = require_job(gateway, id).await?;
    if job.status != JobStatus::Funded {
        if !force {
            return Err(anyhow!(
                "Job {} is {}, only funded jobs can be assigned (pass --force to submit anyway)",
                id,
                job.status
            ));
        }
        warn!(job_id = %id, status = %job.status, "Submitting assignment despite job state");
    }

    let pending = gateway
        .assign_freelancer(id, freelancer)
        .await
        .context("Failed to send assign transaction")?;
    let receipt = gateway
        .confirm(&pending)
        .await
        .with_context(|| format!("Failed to assign job {id}"))?;
    log_events(gateway, &receipt);

    require_job(gateway, id).await
}
