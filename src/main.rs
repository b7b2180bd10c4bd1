mod args;
mod chain;
mod commands;
mod configs;
mod contracts;
mod events;
mod gateway;
mod lifecycle;
mod metadata;
mod types;
mod utils;
mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::error;
use tracing_subscriber::EnvFilter;

use commands::{
    apply::ApplyArgs, assign::AssignArgs, balance::BalanceArgs, create::CreateArgs,
    deploy::DeployArgs, fund::FundArgs, list::ListArgs, release::ReleaseArgs, show::ShowArgs,
    watch::WatchArgs,
};

#[derive(Parser)]
#[command(author, version, about = "Escrow-protected freelance jobs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known jobs with their on-chain status
    List(ListArgs),
    /// Show a job's details and available actions
    Show(ShowArgs),
    /// Post a new job
    Create(CreateArgs),
    /// Approve and fund a job
    Fund(FundArgs),
    /// Assign a freelancer to a funded job
    Assign(AssignArgs),
    /// Release payment to the assigned freelancer
    Release(ReleaseArgs),
    /// Apply to a funded job
    Apply(ApplyArgs),
    /// Follow a job until its payment is released
    Watch(WatchArgs),
    /// Show a payment token balance
    Balance(BalanceArgs),
    /// Deploy the token and escrow contracts
    Deploy(DeployArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref())?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List(args) => commands::list::list_jobs(args).await,
        Commands::Show(args) => commands::show::show_job(args).await,
        Commands::Create(args) => commands::create::create_job(args).await,
        Commands::Fund(args) => commands::fund::fund_job(args).await,
        Commands::Assign(args) => commands::assign::assign_freelancer(args).await,
        Commands::Release(args) => commands::release::release_payment(args).await,
        Commands::Apply(args) => commands::apply::apply_to_job(args).await,
        Commands::Watch(args) => commands::watch::watch(args).await,
        Commands::Balance(args) => commands::balance::show_balance(args).await,
        Commands::Deploy(args) => commands::deploy::deploy(args).await,
    };

    if let Err(err) = &result {
        error!("Error: {:?}", err);
    }

    result
}

/// `info` by default, with `RUST_LOG` layered on top as one extra directive.
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new("info");
    if let Some(var) = rust_log {
        filter = filter.add_directive(
            var.parse()
                .context("Failed to parse the RUST_LOG value set in environment")?,
        );
    }
    Ok(filter)
}
