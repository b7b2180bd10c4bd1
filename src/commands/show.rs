use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::Args;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    commands::{connect, require_job},
    metadata::MetaStore,
    types::JobId,
    view::JobView,
};

/// Show a job's details and the actions available to you
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Job ID
    #[arg(short, long, required = true)]
    job_id: JobId,

    /// View the job as this address instead of the wallet's
    #[arg(long)]
    viewer: Option<Address>,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn show_job(args: ShowArgs) -> Result<()> {
    let (cfg, gateway) = connect(&args.network, &args.wallet, false)?;
    let store = MetaStore::new(&cfg.metadata_path);

    let job = require_job(&gateway, args.job_id).await?;
    let token = gateway
        .token_info_at(job.token)
        .await
        .context("Failed to read payment token")?;

    let viewer = args.viewer.or(gateway.adapter().sender_address);
    let view = JobView::new(job, store.get(args.job_id), viewer);
    print!("{}", view.render(&token));

    Ok(())
}
