use std::{fs, path::Path};

use alloy::primitives::{Address, Bytes};
use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::{
    args::{network::NetworkArgs, wallet::WalletArgs},
    chain::adapter::ChainAdapter,
    commands::connect,
    types::ContractArtifact,
};

/// Deploy the MockUSDC token and the EscrowJobs contract
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Compiled MockUSDC artifact (Hardhat or Foundry JSON)
    #[arg(long, required = true)]
    token_artifact: String,

    /// Compiled EscrowJobs artifact (Hardhat or Foundry JSON)
    #[arg(long, required = true)]
    escrow_artifact: String,

    /// Print the deployed addresses as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(flatten)]
    network: NetworkArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub mock_usdc: Address,
    pub escrow_jobs: Address,
}

pub async fn deploy(args: DeployArgs) -> Result<()> {
    let token_code = read_artifact(&args.token_artifact)?;
    let escrow_code = read_artifact(&args.escrow_artifact)?;

    let (_, gateway) = connect(&args.network, &args.wallet, true)?;
    let deployment = deploy_contracts(gateway.adapter(), token_code, escrow_code).await?;

    info!("Deployment summary:");
    info!("MockUSDC: {}", deployment.mock_usdc);
    info!("EscrowJobs: {}", deployment.escrow_jobs);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&deployment)
                .context("Failed to serialize deployment summary")?
        );
    }

    Ok(())
}

pub fn read_artifact(path: impl AsRef<Path>) -> Result<Bytes> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact {}", path.display()))?;
    let artifact: ContractArtifact = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

    let code = artifact.bytecode().clone();
    if code.is_empty() {
        return Err(anyhow!(
            "Artifact {} has no bytecode",
            artifact.contract_name.as_deref().unwrap_or("unknown")
        ));
    }
    Ok(code)
}

/// Deploys the token, then the escrow. A failed escrow deployment leaves
/// the token deployed; nothing is rolled back.
pub async fn deploy_contracts<A: ChainAdapter>(
    adapter: &A,
    token_code: Bytes,
    escrow_code: Bytes,
) -> Result<Deployment> {
    if let Some(deployer) = adapter.sender_address() {
        info!("Deploying contracts with the account: {}", deployer);
    }

    info!("Deploying MockUSDC...");
    let mock_usdc = deploy_one(adapter, token_code)
        .await
        .context("Failed to deploy MockUSDC")?;
    info!("MockUSDC deployed to: {}", mock_usdc);

    info!("Deploying EscrowJobs...");
    let escrow_jobs = deploy_one(adapter, escrow_code).await.with_context(|| {
        format!("Failed to deploy EscrowJobs, MockUSDC remains deployed at {mock_usdc}")
    })?;
    info!("EscrowJobs deployed to: {}", escrow_jobs);

    Ok(Deployment {
        mock_usdc,
        escrow_jobs,
    })
}

async fn deploy_one<A: ChainAdapter>(adapter: &A, code: Bytes) -> Result<Address> {
    let tx_hash = adapter.deploy(code).await?;
    info!("Deployment transaction hash: {:?}", tx_hash);

    let receipt = adapter.wait_for_receipt(tx_hash).await?;
    if !receipt.success {
        return Err(anyhow!("Deployment transaction {tx_hash} reverted"));
    }
    receipt
        .contract_address
        .ok_or_else(|| anyhow!("Receipt of {tx_hash} has no contract address"))
}
