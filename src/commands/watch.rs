use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    args::network::NetworkArgs,
    chain::{adapter::ChainAdapter, evm::EvmAdapter},
    configs::global::WATCH_INTERVAL_SECS,
    gateway::Gateway,
    lifecycle::{JobStatus, Observation, StatusTracker},
    types::JobId,
};

/// Follow a job's status until its payment is released
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    /// Seconds between polls
    #[arg(long, default_value_t = WATCH_INTERVAL_SECS)]
    interval: u64,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn watch(args: WatchArgs) -> Result<()> {
    let cfg = args.network.resolve()?;
    let gateway = Gateway::new(EvmAdapter::from_config(&cfg, None)?);

    info!("Watching job {}...", args.job_id);
    let status = watch_job(
        &gateway,
        args.job_id,
        Duration::from_secs(args.interval.max(1)),
        |_| {},
    )
    .await?;

    info!("Job {} reached {}", args.job_id, status);
    Ok(())
}

/// Polls the job until it reaches a terminal status. Read failures and
/// missing jobs are logged and retried; a status moving backwards aborts.
pub async fn watch_job<A: ChainAdapter>(
    gateway: &Gateway<A>,
    id: JobId,
    interval: Duration,
    mut on_observation: impl FnMut(Observation),
) -> Result<JobStatus> {
    let mut tracker = StatusTracker::new();

    loop {
        match gateway.fetch_job(id).await {
            Ok(Some(job)) => {
                let observation = tracker.observe(id, job.status)?;
                match observation {
                    Observation::First(status) => info!("Job {} is {}", id, status),
                    Observation::Advanced { from, to } => {
                        info!("Job {} moved from {} to {}", id, from, to);
                        if !from.can_advance_to(to) {
                            info!("Intermediate statuses of job {} were missed between polls", id);
                        }
                    }
                    Observation::Unchanged(_) => {}
                }
                on_observation(observation);

                if job.status.is_terminal() {
                    return Ok(job.status);
                }
            }
            Ok(None) => match tracker.last_seen(id) {
                Some(status) => warn!(job_id = %id, last_seen = %status, "Job is no longer on chain"),
                None => info!("Job {} is not on chain yet", id),
            },
            Err(e) => warn!(job_id = %id, error = %e, "Failed to fetch job, retrying"),
        }

        sleep(interval).await;
    }
}
