use std::collections::{HashMap, HashSet};

use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crate::{
    args::network::NetworkArgs,
    chain::{adapter::ChainAdapter, evm::EvmAdapter},
    gateway::Gateway,
    metadata::MetaStore,
    types::{JobId, TokenInfo},
    view::{ListingRow, render_listing},
};

/// List known jobs with their on-chain status
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Extra job IDs to look up on-chain (comma separated)
    #[arg(long, value_delimiter = ',')]
    ids: Vec<JobId>,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn list_jobs(args: ListArgs) -> Result<()> {
    let cfg = args.network.resolve()?;
    let gateway = Gateway::new(EvmAdapter::from_config(&cfg, None)?);
    let store = MetaStore::new(&cfg.metadata_path);

    let token = gateway
        .token_info()
        .await
        .context("Failed to read payment token")?;
    let rows = collect_listing(&gateway, &store, &args.ids).await;
    if rows.is_empty() {
        info!("No jobs found in {}", store.path().display());
        return Ok(());
    }

    render_listing(&rows, &token).printstd();
    Ok(())
}

/// Locally known jobs, newest first, followed by `extra_ids` not already
/// listed. A failed lookup stays in the listing as unavailable.
pub async fn collect_listing<A: ChainAdapter>(
    gateway: &Gateway<A>,
    store: &MetaStore,
    extra_ids: &[JobId],
) -> Vec<ListingRow> {
    let metas = store.list();
    let mut seen: HashSet<JobId> = metas.iter().map(|meta| meta.id).collect();

    let mut pending: Vec<_> = metas.into_iter().map(|meta| (meta.id, Some(meta))).collect();
    for id in extra_ids {
        if seen.insert(*id) {
            pending.push((*id, None));
        }
    }

    let mut tokens: HashMap<Address, Option<TokenInfo>> = HashMap::new();
    let mut rows = Vec::with_capacity(pending.len());
    for (id, meta) in pending {
        let job = gateway.fetch_job(id).await.map_err(|e| {
            warn!(job_id = %id, error = %e, "Failed to fetch job");
            e.to_string()
        });

        let token = match &job {
            Ok(Some(job)) => match tokens.get(&job.token) {
                Some(info) => info.clone(),
                None => {
                    let info = gateway
                        .token_info_at(job.token)
                        .await
                        .inspect_err(|e| {
                            warn!(token = %job.token, error = %e, "Failed to read token")
                        })
                        .ok();
                    tokens.insert(job.token, info.clone());
                    info
                }
            },
            _ => None,
        };

        rows.push(ListingRow {
            id,
            meta,
            job,
            token,
        });
    }
    rows
}
