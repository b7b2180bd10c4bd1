use alloy::{
    network::EthereumWallet,
    primitives::{Address, FixedBytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use anyhow::{Context, Result};

/// Builds an HTTP provider for `rpc_url`. With a private key the provider
/// signs and fills transactions locally; without one it is read-only.
pub fn create_ethereum_provider(
    rpc_url: &str,
    wallet_private_key: Option<&str>,
) -> Result<(DynProvider, Option<Address>)> {
    let url: Url = rpc_url.parse().context("Failed to parse RPC URL")?;

    let Some(wallet_private_key) = wallet_private_key else {
        let provider = ProviderBuilder::new().connect_http(url).erased();
        return Ok((provider, None));
    };

    let signer = create_signer(wallet_private_key)?;
    let sender = signer.address();
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(url)
        .erased();

    Ok((provider, Some(sender)))
}

pub fn create_signer(wallet_private_key: &str) -> Result<PrivateKeySigner> {
    let key_bytes = hex::decode(wallet_private_key.trim().trim_start_matches("0x"))
        .context("Failed to decode private key")?;
    let private_key = FixedBytes::<32>::try_from(key_bytes.as_slice())
        .context("Private key must be 32 bytes")?;

    PrivateKeySigner::from_bytes(&private_key).context("Failed to create signer from private key")
}
