use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::types::{JobId, JobRecord, TokenInfo, TxReceipt};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The node could not be reached or returned garbage.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transaction never made it into the mempool: the signer declined,
    /// gas estimation reverted or the node refused it.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("no wallet configured, a private key is required for writes")]
    NoWallet,

    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(TxHash),
}

/// State-changing calls. `Approve` goes to the ERC20 at `token`, everything
/// else to the escrow contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowCall {
    CreateJob {
        job_id: JobId,
        amount: U256,
        token: Address,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    FundJob {
        job_id: JobId,
    },
    AssignFreelancer {
        job_id: JobId,
        freelancer: Address,
    },
    ReleasePayment {
        job_id: JobId,
    },
}

impl EscrowCall {
    pub fn name(&self) -> &'static str {
        match self {
            EscrowCall::CreateJob { .. } => "createJob",
            EscrowCall::Approve { .. } => "approve",
            EscrowCall::FundJob { .. } => "fundJob",
            EscrowCall::AssignFreelancer { .. } => "assignFreelancer",
            EscrowCall::ReleasePayment { .. } => "releasePayment",
        }
    }
}

#[async_trait]
pub trait ChainAdapter: Send + Sync {
    fn sender_address(&self) -> Option<Address>;
    fn escrow_address(&self) -> Address;
    fn token_address(&self) -> Address;

    async fn read_job(&self, job_id: JobId) -> Result<JobRecord, ChainError>;
    async fn token_info(&self, token: Address) -> Result<TokenInfo, ChainError>;
    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError>;

    /// Signs and broadcasts `call`, returning as soon as the node accepted it.
    async fn submit(&self, call: EscrowCall) -> Result<TxHash, ChainError>;

    /// Broadcasts a contract creation transaction with the given init code.
    async fn deploy(&self, bytecode: Bytes) -> Result<TxHash, ChainError>;

    /// Blocks until the transaction is mined. A mined but reverted
    /// transaction is still `Ok`, with `success == false`.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError>;
}

#[async_trait]
impl<T: ChainAdapter + ?Sized> ChainAdapter for &T {
    fn sender_address(&self) -> Option<Address> {
        (**self).sender_address()
    }

    fn escrow_address(&self) -> Address {
        (**self).escrow_address()
    }

    fn token_address(&self) -> Address {
        (**self).token_address()
    }

    async fn read_job(&self, job_id: JobId) -> Result<JobRecord, ChainError> {
        (**self).read_job(job_id).await
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo, ChainError> {
        (**self).token_info(token).await
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        (**self).token_balance(token, account).await
    }

    async fn submit(&self, call: EscrowCall) -> Result<TxHash, ChainError> {
        (**self).submit(call).await
    }

    async fn deploy(&self, bytecode: Bytes) -> Result<TxHash, ChainError> {
        (**self).deploy(bytecode).await
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        (**self).wait_for_receipt(tx_hash).await
    }
}
