use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::configs::network::NetworkConfig;

#[derive(Args, Debug, Default)]
pub struct NetworkArgs {
    /// Path to a JSON config file (defaults to ./config/config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RPC URL (overrides the config file)
    #[arg(long)]
    pub rpc: Option<String>,

    /// EscrowJobs contract address (overrides the config file)
    #[arg(long)]
    pub escrow: Option<String>,

    /// Payment token contract address (overrides the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Local job metadata file (overrides the config file)
    #[arg(long)]
    pub metadata_path: Option<PathBuf>,
}

impl NetworkArgs {
    pub fn resolve(&self) -> Result<NetworkConfig> {
        let mut cfg = NetworkConfig::load(self.config.as_deref())?;

        if let Some(rpc) = &self.rpc {
            cfg.rpc_url = rpc.clone();
        }
        if let Some(escrow) = &self.escrow {
            cfg.escrow_address = escrow.clone();
        }
        if let Some(token) = &self.token {
            cfg.token_address = token.clone();
        }
        if let Some(path) = &self.metadata_path {
            cfg.metadata_path = path.clone();
        }

        Ok(cfg)
    }
}
