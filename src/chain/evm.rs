use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    chain::adapter::{ChainAdapter, ChainError, EscrowCall},
    configs::network::NetworkConfig,
    contracts::{EscrowJobs, MockUSDC},
    types::{JobId, JobRecord, TokenInfo, TxReceipt},
    utils::provider::create_ethereum_provider,
};

pub struct EvmAdapter {
    pub provider: DynProvider,
    pub escrow_address: Address,
    pub token_address: Address,
    pub sender_address: Option<Address>,
    pub poll_interval: Duration,
    pub poll_retries: u32,
}

impl EvmAdapter {
    pub fn from_config(cfg: &NetworkConfig, wallet_private_key: Option<&str>) -> Result<Self> {
        let (provider, sender_address) = create_ethereum_provider(&cfg.rpc_url, wallet_private_key)
            .context("Failed to create provider")?;

        Ok(Self {
            provider,
            escrow_address: cfg.escrow()?,
            token_address: cfg.token()?,
            sender_address,
            poll_interval: cfg.receipt_poll_interval(),
            poll_retries: cfg.receipt_poll_retries,
        })
    }

    fn escrow(&self) -> EscrowJobs::EscrowJobsInstance<DynProvider> {
        EscrowJobs::new(self.escrow_address, self.provider.clone())
    }

    fn erc20(&self, token: Address) -> MockUSDC::MockUSDCInstance<DynProvider> {
        MockUSDC::new(token, self.provider.clone())
    }

    fn require_wallet(&self) -> Result<(), ChainError> {
        match self.sender_address {
            Some(_) => Ok(()),
            None => Err(ChainError::NoWallet),
        }
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    fn sender_address(&self) -> Option<Address> {
        self.sender_address
    }

    fn escrow_address(&self) -> Address {
        self.escrow_address
    }

    fn token_address(&self) -> Address {
        self.token_address
    }

    async fn read_job(&self, job_id: JobId) -> Result<JobRecord, ChainError> {
        let job = self
            .escrow()
            .jobs(job_id.as_u256())
            .call()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        Ok(JobRecord {
            id: job.id,
            client: job.client,
            freelancer: job.freelancer,
            amount: job.amount,
            token: job.token,
            status: job.status,
        })
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo, ChainError> {
        let erc20 = self.erc20(token);
        let symbol = erc20
            .symbol()
            .call()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        let decimals = erc20
            .decimals()
            .call()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        Ok(TokenInfo { symbol, decimals })
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        self.erc20(token)
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))
    }

    async fn submit(&self, call: EscrowCall) -> Result<TxHash, ChainError> {
        self.require_wallet()?;

        let escrow = self.escrow();
        let name = call.name();
        let pending = match call {
            EscrowCall::CreateJob {
                job_id,
                amount,
                token,
            } => {
                escrow
                    .createJob(job_id.as_u256(), amount, token)
                    .send()
                    .await
            }
            EscrowCall::Approve {
                token,
                spender,
                amount,
            } => self.erc20(token).approve(spender, amount).send().await,
            EscrowCall::FundJob { job_id } => escrow.fundJob(job_id.as_u256()).send().await,
            EscrowCall::AssignFreelancer { job_id, freelancer } => {
                escrow
                    .assignFreelancer(job_id.as_u256(), freelancer)
                    .send()
                    .await
            }
            EscrowCall::ReleasePayment { job_id } => {
                escrow.releasePayment(job_id.as_u256()).send().await
            }
        }
        .map_err(|e| ChainError::Rejected(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        debug!(call = name, ?tx_hash, "Transaction submitted");
        Ok(tx_hash)
    }

    async fn deploy(&self, bytecode: Bytes) -> Result<TxHash, ChainError> {
        self.require_wallet()?;

        let tx = TransactionRequest::default().with_deploy_code(bytecode);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        for attempt in 1..=self.poll_retries {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    info!(?tx_hash, block = ?receipt.block_number, "Transaction mined");
                    return Ok(TxReceipt {
                        tx_hash,
                        success: receipt.status(),
                        block_number: receipt.block_number,
                        contract_address: receipt.contract_address,
                        logs: receipt
                            .inner
                            .logs()
                            .iter()
                            .map(|log| log.inner.clone())
                            .collect(),
                    });
                }
                Ok(None) => debug!(?tx_hash, attempt, "Receipt not available yet"),
                Err(e) => warn!(?tx_hash, attempt, error = %e, "Failed to fetch receipt"),
            }
            sleep(self.poll_interval).await;
        }

        Err(ChainError::ReceiptTimeout(tx_hash))
    }
}
