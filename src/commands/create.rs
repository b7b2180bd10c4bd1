use alloy::primitives::Address;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use tracing::info;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::adapter::ChainAdapter,
    commands::{connect, log_events},
    gateway::Gateway,
    metadata::{JobMeta, MetaStore},
    types::{JobId, TxReceipt},
    utils::units::{parse_token_amount, token_to_f64},
};

/// Post a new job with escrow protection
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Job ID (generated from the current time when omitted)
    #[arg(short, long)]
    job_id: Option<JobId>,

    /// Amount in token units (e.g. 12.5)
    #[arg(short, long, required = true)]
    amount: String,

    /// Job title
    #[arg(long, default_value = "")]
    title: String,

    /// Job description
    #[arg(long, default_value = "")]
    description: String,

    /// Country where the work is based
    #[arg(long, default_value = "")]
    country: String,

    /// Payment token address (defaults to the configured token)
    #[arg(long)]
    payment_token: Option<Address>,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

pub struct NewJob {
    pub job_id: Option<JobId>,
    pub amount: String,
    pub title: String,
    pub description: String,
    pub country: String,
    pub token: Option<Address>,
}

pub async fn create_job(args: CreateArgs) -> Result<()> {
    info!("Starting job creation...");

    let (cfg, gateway) = connect(&args.network, &args.wallet, true)?;
    let store = MetaStore::new(&cfg.metadata_path);

    let (job_id, _) = submit_job(
        &gateway,
        &store,
        NewJob {
            job_id: args.job_id,
            amount: args.amount,
            title: args.title,
            description: args.description,
            country: args.country,
            token: args.payment_token,
        },
    )
    .await?;

    info!("Job {} created successfully!", job_id);
    Ok(())
}

/// Submits `createJob`, records the metadata as soon as the node accepted the
/// transaction, then waits for confirmation.
pub async fn submit_job<A: ChainAdapter>(
    gateway: &Gateway<A>,
    store: &MetaStore,
    job: NewJob,
) -> Result<(JobId, TxReceipt)> {
    let token_address = job
        .token
        .unwrap_or_else(|| gateway.adapter().token_address());
    let token = gateway
        .token_info_at(token_address)
        .await
        .context("Failed to read payment token")?;
    let amount = parse_token_amount(&job.amount, token.decimals)?;
    info!("Escrow amount: {} {}", job.amount, token.symbol);

    let pending = gateway
        .create_job(job.job_id, amount, Some(token_address))
        .await
        .context("Failed to send create job transaction")?;
    let job_id = pending
        .job_id
        .context("Create job transaction carries no job ID")?;
    info!("Create job transaction hash: {:?}", pending.tx_hash);

    store.put(JobMeta {
        id: job_id,
        title: job.title,
        description: job.description,
        country: job.country,
        value_usdc: token_to_f64(amount, token.decimals),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    });

    let receipt = gateway
        .confirm(&pending)
        .await
        .with_context(|| format!("Job {job_id} was not created"))?;
    log_events(gateway, &receipt);

    Ok((job_id, receipt))
}
