use std::fmt;

use alloy::primitives::{Address, TxHash, U256};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    chain::adapter::{ChainAdapter, ChainError, EscrowCall},
    lifecycle::{JobStatus, LifecycleError},
    types::{Job, JobId, TokenInfo, TxReceipt},
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("job {0} already exists")]
    AlreadyExists(JobId),

    #[error("job amount must be greater than zero")]
    InvalidAmount,

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("job {id} has an invalid on-chain record: {source}")]
    Decode {
        id: JobId,
        #[source]
        source: LifecycleError,
    },
}

/// A write that the node accepted but that has not been confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: TxHash,
    pub call: &'static str,
    pub job_id: Option<JobId>,
}

/// Observable progress of [`Gateway::fund_job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundStage {
    AwaitingApprovalConfirmation,
    AwaitingFundConfirmation,
    Done,
}

impl fmt::Display for FundStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FundStage::AwaitingApprovalConfirmation => "awaiting-approval-confirmation",
            FundStage::AwaitingFundConfirmation => "awaiting-fund-confirmation",
            FundStage::Done => "done",
        })
    }
}

#[derive(Debug, Clone)]
pub struct FundReceipts {
    pub approval: TxReceipt,
    pub fund: TxReceipt,
}

/// Turns job intents into escrow contract calls and normalises the results.
///
/// The contract is the only judge of whether a transition is legal; the
/// gateway does not pre-check statuses and reports reverts as
/// [`GatewayError::Reverted`].
pub struct Gateway<A> {
    adapter: A,
}

impl<A: ChainAdapter> Gateway<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// `Ok(None)` when the contract has no such job (zero client or zero
    /// amount). A failed read is an `Err`, never `Ok(None)`.
    pub async fn fetch_job(&self, id: JobId) -> Result<Option<Job>, GatewayError> {
        let record = self.adapter.read_job(id).await.inspect_err(|e| {
            debug!(job_id = %id, error = %e, "Failed to read job");
        })?;

        if record.client == Address::ZERO || record.amount.is_zero() {
            return Ok(None);
        }

        let status = JobStatus::try_from(record.status)
            .map_err(|source| GatewayError::Decode { id, source })?;

        Ok(Some(Job {
            id,
            client: record.client,
            freelancer: record.freelancer,
            amount: record.amount,
            token: record.token,
            status,
        }))
    }

    /// Submits `createJob`. Without an explicit id a millisecond timestamp is
    /// used; an id that is already taken is refused before submitting.
    pub async fn create_job(
        &self,
        id: Option<JobId>,
        amount: U256,
        token: Option<Address>,
    ) -> Result<PendingTx, GatewayError> {
        if amount.is_zero() {
            return Err(GatewayError::InvalidAmount);
        }

        let id = id.unwrap_or_else(|| JobId::from_timestamp(Utc::now()));
        if self.fetch_job(id).await?.is_some() {
            return Err(GatewayError::AlreadyExists(id));
        }

        let token = token.unwrap_or_else(|| self.adapter.token_address());
        self.send(
            EscrowCall::CreateJob {
                job_id: id,
                amount,
                token,
            },
            Some(id),
        )
        .await
    }

    /// Approves the escrow for `amount` on the job's payment `token`, waits
    /// for that approval to be mined, then submits and confirms `fundJob`.
    /// The fund call is never submitted unless the approval receipt succeeded.
    pub async fn fund_job(
        &self,
        id: JobId,
        token: Address,
        amount: U256,
        mut on_stage: impl FnMut(FundStage),
    ) -> Result<FundReceipts, GatewayError> {
        let approval = self
            .send(
                EscrowCall::Approve {
                    token,
                    spender: self.adapter.escrow_address(),
                    amount,
                },
                Some(id),
            )
            .await?;
        on_stage(FundStage::AwaitingApprovalConfirmation);
        let approval = self.confirm(&approval).await?;

        let fund = self
            .send(EscrowCall::FundJob { job_id: id }, Some(id))
            .await?;
        on_stage(FundStage::AwaitingFundConfirmation);
        let fund = self.confirm(&fund).await?;

        on_stage(FundStage::Done);
        Ok(FundReceipts { approval, fund })
    }

    pub async fn assign_freelancer(
        &self,
        id: JobId,
        freelancer: Address,
    ) -> Result<PendingTx, GatewayError> {
        self.send(
            EscrowCall::AssignFreelancer {
                job_id: id,
                freelancer,
            },
            Some(id),
        )
        .await
    }

    pub async fn release_payment(&self, id: JobId) -> Result<PendingTx, GatewayError> {
        self.send(EscrowCall::ReleasePayment { job_id: id }, Some(id))
            .await
    }

    /// Waits for `pending` to be mined. A reverted transaction is an error.
    pub async fn confirm(&self, pending: &PendingTx) -> Result<TxReceipt, GatewayError> {
        let receipt = self.adapter.wait_for_receipt(pending.tx_hash).await?;
        if !receipt.success {
            return Err(GatewayError::Reverted(pending.tx_hash));
        }

        info!(call = pending.call, tx_hash = ?pending.tx_hash, "Transaction confirmed");
        Ok(receipt)
    }

    /// Symbol and decimals of the configured payment token.
    pub async fn token_info(&self) -> Result<TokenInfo, GatewayError> {
        self.token_info_at(self.adapter.token_address()).await
    }

    pub async fn token_info_at(&self, token: Address) -> Result<TokenInfo, GatewayError> {
        Ok(self.adapter.token_info(token).await?)
    }

    /// Balance of `account` in the configured payment token.
    pub async fn token_balance(&self, account: Address) -> Result<U256, GatewayError> {
        let token = self.adapter.token_address();
        Ok(self.adapter.token_balance(token, account).await?)
    }

    async fn send(
        &self,
        call: EscrowCall,
        job_id: Option<JobId>,
    ) -> Result<PendingTx, GatewayError> {
        let name = call.name();
        let tx_hash = self.adapter.submit(call).await?;
        info!(call = name, ?tx_hash, "Transaction pending");

        Ok(PendingTx {
            tx_hash,
            call: name,
            job_id,
        })
    }
}
