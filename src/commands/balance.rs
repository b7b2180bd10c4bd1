use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use tracing::info;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    commands::connect,
    utils::units::format_token,
};

/// Show the payment token balance of an account
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Account to query (defaults to the wallet address)
    #[arg(short, long)]
    account: Option<Address>,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn show_balance(args: BalanceArgs) -> Result<()> {
    let (_, gateway) = connect(&args.network, &args.wallet, false)?;
    let account = args
        .account
        .or(gateway.adapter().sender_address)
        .ok_or_else(|| anyhow!("Pass --account or configure a wallet"))?;

    let token = gateway
        .token_info()
        .await
        .context("Failed to read payment token")?;
    let balance = gateway
        .token_balance(account)
        .await
        .context("Failed to fetch token balance")?;

    info!(
        "Balance of {}: {} {}",
        account,
        format_token(balance, token.decimals),
        token.symbol
    );
    Ok(())
}
