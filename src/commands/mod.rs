pub mod apply;
pub mod assign;
pub mod balance;
pub mod create;
pub mod deploy;
pub mod fund;
pub mod list;
pub mod release;
pub mod show;
pub mod watch;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::{adapter::ChainAdapter, evm::EvmAdapter},
    configs::network::NetworkConfig,
    events::decode_receipt,
    gateway::Gateway,
    types::{Job, JobId, TxReceipt},
};

/// Resolves config and builds a gateway. Without `wallet_required` a missing
/// key yields a read-only gateway.
pub(crate) fn connect(
    network: &NetworkArgs,
    wallet: &WalletArgs,
    wallet_required: bool,
) -> Result<(NetworkConfig, Gateway<EvmAdapter>)> {
    let cfg = network.resolve()?;
    let key = if wallet_required {
        Some(wallet.load_required()?)
    } else {
        wallet.load()?
    };

    let adapter = EvmAdapter::from_config(&cfg, key.as_deref())?;
    if let Some(sender) = adapter.sender_address {
        info!("Signer address: {:?}", sender);
    }

    Ok((cfg, Gateway::new(adapter)))
}

/// Fetches a job that must exist.
pub(crate) async fn require_job<A: ChainAdapter>(gateway: &Gateway<A>, id: JobId) -> Result<Job> {
    gateway
        .fetch_job(id)
        .await
        .map_err(|e| anyhow!("Failed to query job {id}: {e}"))?
        .ok_or_else(|| anyhow!("Job {id} does not exist"))
}

pub(crate) fn log_events<A: ChainAdapter>(gateway: &Gateway<A>, receipt: &TxReceipt) {
    match decode_receipt(receipt, gateway.adapter().escrow_address()) {
        Ok(events) => {
            for event in events {
                info!("Event: {}", event);
            }
        }
        Err(e) => info!(error = %e, "Could not decode receipt events"),
    }
}
