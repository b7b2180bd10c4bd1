use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::debug;

use crate::configs::global::{
    CONFIG_CANDIDATES, DEFAULT_METADATA_PATH, ESCROW_JOBS_ADDRESS, LOCAL_RPC_URL,
    MOCK_USDC_ADDRESS, RECEIPT_POLL_INTERVAL_MS, RECEIPT_POLL_RETRIES,
};

/// Network and storage settings shared by every command.
///
/// Every field is optional in the file; missing ones fall back to the local
/// Hardhat defaults in [`crate::configs::global`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub escrow_address: String,
    pub token_address: String,
    pub metadata_path: PathBuf,
    pub receipt_poll_interval_ms: u64,
    pub receipt_poll_retries: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: LOCAL_RPC_URL.to_owned(),
            escrow_address: ESCROW_JOBS_ADDRESS.to_owned(),
            token_address: MOCK_USDC_ADDRESS.to_owned(),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            receipt_poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
            receipt_poll_retries: RECEIPT_POLL_RETRIES,
        }
    }
}

impl NetworkConfig {
    /// Loads the config from `path`, or from the first readable default
    /// location. An explicit path that cannot be read is an error; absent
    /// default files are not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            return Self::parse(&contents, &path.display().to_string());
        }

        match CONFIG_CANDIDATES
            .iter()
            .find_map(|p| fs::read_to_string(p).ok().map(|s| (*p, s)))
        {
            Some((path, contents)) => Self::parse(&contents, path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn parse(contents: &str, path: &str) -> Result<Self> {
        let cfg: NetworkConfig =
            serde_json::from_str(contents).with_context(|| format!("parse failed for {path}"))?;
        debug!(path, "Loaded config");
        Ok(cfg)
    }

    pub fn escrow(&self) -> Result<Address> {
        self.escrow_address
            .parse()
            .map_err(|_| anyhow!("invalid escrow_address '{}'", self.escrow_address))
    }

    pub fn token(&self) -> Result<Address> {
        self.token_address
            .parse()
            .map_err(|_| anyhow!("invalid token_address '{}'", self.token_address))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
