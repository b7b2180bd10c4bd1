use std::fs;

use anyhow::{Context, Result, anyhow};
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct WalletArgs {
    /// Wallet private key (hex, with or without 0x)
    #[arg(long, conflicts_with = "wallet_private_key_file")]
    pub wallet_private_key: Option<String>,

    /// File containing the wallet private key
    #[arg(long)]
    pub wallet_private_key_file: Option<String>,
}

impl WalletArgs {
    /// The configured private key, if any.
    pub fn load(&self) -> Result<Option<String>> {
        if let Some(key) = &self.wallet_private_key {
            return Ok(Some(key.trim().to_owned()));
        }

        if let Some(path) = &self.wallet_private_key_file {
            let key = fs::read_to_string(path)
                .with_context(|| format!("Failed to read wallet private key file {path}"))?;
            return Ok(Some(key.trim().to_owned()));
        }

        Ok(None)
    }

    pub fn load_required(&self) -> Result<String> {
        self.load()?.ok_or_else(|| {
            anyhow!("Wallet private key is required, pass --wallet-private-key or --wallet-private-key-file")
        })
    }
}
