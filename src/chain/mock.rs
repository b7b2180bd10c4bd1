use std::{collections::HashMap, sync::Mutex};

use alloy::{
    primitives::{Address, B256, Bytes, Log, TxHash, U256},
    sol_types::SolEvent,
};
use async_trait::async_trait;

use crate::{
    chain::adapter::{ChainAdapter, ChainError, EscrowCall},
    contracts::EscrowJobs,
    types::{JobId, JobRecord, TokenInfo, TxReceipt},
};

pub const MOCK_ESCROW: Address = Address::repeat_byte(0xe5);
pub const MOCK_TOKEN: Address = Address::repeat_byte(0x70);

#[derive(Debug, Clone)]
enum MockCall {
    Escrow(EscrowCall),
    Deploy,
}

#[derive(Debug, Clone)]
struct MockTx {
    hash: TxHash,
    sender: Address,
    call: MockCall,
    receipt: Option<TxReceipt>,
}

#[derive(Debug, Default)]
struct MockState {
    jobs: HashMap<JobId, JobRecord>,
    // (token, owner, spender) -> amount
    allowances: HashMap<(Address, Address, Address), U256>,
    // (token, account) -> amount
    balances: HashMap<(Address, Address), U256>,
    txs: Vec<MockTx>,
    history: Vec<String>,
    deployments: usize,
    fail_reads: bool,
    reject_submits: bool,
    fail_deploy_number: Option<usize>,
}

/// In-memory escrow plus any number of ERC20 ledgers, [`MOCK_TOKEN`] being
/// the configured one. Submitted calls take effect only once their receipt is
/// awaited, like a node that mines on demand.
pub struct MockAdapter {
    sender: Option<Address>,
    state: Mutex<MockState>,
}

impl MockAdapter {
    pub fn new(sender: Address) -> Self {
        Self {
            sender: Some(sender),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn read_only() -> Self {
        Self {
            sender: None,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Another signer sharing the same chain state.
    pub fn with_sender(&self, sender: Address) -> MockAdapterHandle<'_> {
        MockAdapterHandle {
            inner: self,
            sender,
        }
    }

    pub fn set_balance(&self, account: Address, amount: U256) {
        self.set_token_balance(MOCK_TOKEN, account, amount);
    }

    pub fn set_token_balance(&self, token: Address, account: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((token, account), amount);
    }

    pub fn insert_raw_job(&self, job_id: JobId, record: JobRecord) {
        self.state.lock().unwrap().jobs.insert(job_id, record);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn set_reject_submits(&self, reject: bool) {
        self.state.lock().unwrap().reject_submits = reject;
    }

    /// Makes the n-th deployment (1-based) get rejected.
    pub fn fail_deploy_number(&self, n: usize) {
        self.state.lock().unwrap().fail_deploy_number = Some(n);
    }

    /// Submission and confirmation order, e.g. `["submit approve", "confirm approve"]`.
    pub fn history(&self) -> Vec<String> {
        self.state.lock().unwrap().history.clone()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowance_on(MOCK_TOKEN, owner, spender)
    }

    pub fn allowance_on(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn balance_of(&self, token: Address, account: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    fn read_job_inner(&self, job_id: JobId) -> Result<JobRecord, ChainError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ChainError::Transport("connection refused".into()));
        }
        Ok(state.jobs.get(&job_id).cloned().unwrap_or_default())
    }

    fn submit_inner(&self, sender: Option<Address>, call: EscrowCall) -> Result<TxHash, ChainError> {
        let sender = sender.ok_or(ChainError::NoWallet)?;
        let mut state = self.state.lock().unwrap();
        if state.reject_submits {
            return Err(ChainError::Rejected("User rejected the request".into()));
        }

        if let EscrowCall::FundJob { .. } = call {
            if let Some(tx) = state.txs.iter().find(|tx| {
                tx.receipt.is_none() && matches!(tx.call, MockCall::Escrow(EscrowCall::Approve { .. }))
            }) {
                panic!("fundJob submitted while approval {} is unconfirmed", tx.hash);
            }
        }

        let hash = next_hash(&state);
        state.history.push(format!("submit {}", call.name()));
        state.txs.push(MockTx {
            hash,
            sender,
            call: MockCall::Escrow(call),
            receipt: None,
        });
        Ok(hash)
    }

    fn deploy_inner(&self, sender: Option<Address>) -> Result<TxHash, ChainError> {
        let sender = sender.ok_or(ChainError::NoWallet)?;
        let mut state = self.state.lock().unwrap();
        state.deployments += 1;
        if state.fail_deploy_number == Some(state.deployments) {
            return Err(ChainError::Rejected("insufficient funds for gas".into()));
        }

        let hash = next_hash(&state);
        state.history.push("submit deploy".into());
        state.txs.push(MockTx {
            hash,
            sender,
            call: MockCall::Deploy,
            receipt: None,
        });
        Ok(hash)
    }

    fn wait_inner(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.txs.iter().position(|tx| tx.hash == tx_hash) else {
            return Err(ChainError::ReceiptTimeout(tx_hash));
        };
        if let Some(receipt) = &state.txs[index].receipt {
            return Ok(receipt.clone());
        }

        let tx = state.txs[index].clone();
        let (success, logs, contract_address) = match &tx.call {
            MockCall::Escrow(call) => {
                state.history.push(format!("confirm {}", call.name()));
                match apply(&mut state, tx.sender, call) {
                    Some(logs) => (true, logs, None),
                    None => (false, vec![], None),
                }
            }
            MockCall::Deploy => {
                state.history.push("confirm deploy".into());
                (true, vec![], Some(Address::with_last_byte(index as u8 + 1)))
            }
        };

        let receipt = TxReceipt {
            tx_hash,
            success,
            block_number: Some(index as u64 + 1),
            contract_address,
            logs,
        };
        state.txs[index].receipt = Some(receipt.clone());
        Ok(receipt)
    }
}

fn next_hash(state: &MockState) -> TxHash {
    B256::from(U256::from(state.txs.len() as u64 + 1).to_be_bytes::<32>())
}

fn debit(state: &mut MockState, token: Address, account: Address, amount: U256) -> bool {
    let balance = state.balances.entry((token, account)).or_default();
    if *balance < amount {
        return false;
    }
    *balance -= amount;
    true
}

fn credit(state: &mut MockState, token: Address, account: Address, amount: U256) {
    *state.balances.entry((token, account)).or_default() += amount;
}

fn escrow_log(data: alloy::primitives::LogData) -> Log {
    Log {
        address: MOCK_ESCROW,
        data,
    }
}

/// Escrow contract rules. `None` means the call reverted.
fn apply(state: &mut MockState, sender: Address, call: &EscrowCall) -> Option<Vec<Log>> {
    match call {
        EscrowCall::CreateJob {
            job_id,
            amount,
            token,
        } => {
            let exists = state
                .jobs
                .get(job_id)
                .is_some_and(|job| job.client != Address::ZERO);
            if exists || amount.is_zero() {
                return None;
            }
            state.jobs.insert(
                *job_id,
                JobRecord {
                    id: job_id.as_u256(),
                    client: sender,
                    freelancer: Address::ZERO,
                    amount: *amount,
                    token: *token,
                    status: 0,
                },
            );
            Some(vec![escrow_log(
                EscrowJobs::JobCreated {
                    jobId: job_id.as_u256(),
                    client: sender,
                    amount: *amount,
                    token: *token,
                }
                .encode_log_data(),
            )])
        }
        EscrowCall::Approve {
            token,
            spender,
            amount,
        } => {
            state.allowances.insert((*token, sender, *spender), *amount);
            Some(vec![])
        }
        EscrowCall::FundJob { job_id } => {
            let job = state.jobs.get(job_id).cloned()?;
            if job.status != 0 {
                return None;
            }
            // the escrow pulls from the job's own token
            let allowance = state
                .allowances
                .get(&(job.token, sender, MOCK_ESCROW))
                .copied()
                .unwrap_or_default();
            if allowance < job.amount || !debit(state, job.token, sender, job.amount) {
                return None;
            }
            state
                .allowances
                .insert((job.token, sender, MOCK_ESCROW), allowance - job.amount);
            credit(state, job.token, MOCK_ESCROW, job.amount);
            state.jobs.get_mut(job_id)?.status = 1;
            Some(vec![escrow_log(
                EscrowJobs::JobFunded {
                    jobId: job_id.as_u256(),
                    client: sender,
                    amount: job.amount,
                }
                .encode_log_data(),
            )])
        }
        EscrowCall::AssignFreelancer { job_id, freelancer } => {
            let job = state.jobs.get_mut(job_id)?;
            if job.status != 1 || *freelancer == Address::ZERO {
                return None;
            }
            job.freelancer = *freelancer;
            job.status = 2;
            Some(vec![escrow_log(
                EscrowJobs::JobAssigned {
                    jobId: job_id.as_u256(),
                    freelancer: *freelancer,
                }
                .encode_log_data(),
            )])
        }
        EscrowCall::ReleasePayment { job_id } => {
            let job = state.jobs.get(job_id).cloned()?;
            if job.status != 2 || job.client != sender {
                return None;
            }
            if !debit(state, job.token, MOCK_ESCROW, job.amount) {
                return None;
            }
            credit(state, job.token, job.freelancer, job.amount);
            state.jobs.get_mut(job_id)?.status = 3;
            Some(vec![escrow_log(
                EscrowJobs::PaymentReleased {
                    jobId: job_id.as_u256(),
                    freelancer: job.freelancer,
                    amount: job.amount,
                }
                .encode_log_data(),
            )])
        }
    }
}

#[async_trait]
impl ChainAdapter for MockAdapter {
    fn sender_address(&self) -> Option<Address> {
        self.sender
    }

    fn escrow_address(&self) -> Address {
        MOCK_ESCROW
    }

    fn token_address(&self) -> Address {
        MOCK_TOKEN
    }

    async fn read_job(&self, job_id: JobId) -> Result<JobRecord, ChainError> {
        self.read_job_inner(job_id)
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo, ChainError> {
        // every other token is an 18 decimal ERC20
        Ok(if token == MOCK_TOKEN {
            TokenInfo {
                symbol: "mUSDC".into(),
                decimals: 6,
            }
        } else {
            TokenInfo {
                symbol: "TKN".into(),
                decimals: 18,
            }
        })
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        Ok(self.balance_of(token, account))
    }

    async fn submit(&self, call: EscrowCall) -> Result<TxHash, ChainError> {
        self.submit_inner(self.sender, call)
    }

    async fn deploy(&self, _bytecode: Bytes) -> Result<TxHash, ChainError> {
        self.deploy_inner(self.sender)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        self.wait_inner(tx_hash)
    }
}

/// A [`MockAdapter`] view that signs as a different account.
pub struct MockAdapterHandle<'a> {
    inner: &'a MockAdapter,
    sender: Address,
}

#[async_trait]
impl ChainAdapter for MockAdapterHandle<'_> {
    fn sender_address(&self) -> Option<Address> {
        Some(self.sender)
    }

    fn escrow_address(&self) -> Address {
        MOCK_ESCROW
    }

    fn token_address(&self) -> Address {
        MOCK_TOKEN
    }

    async fn read_job(&self, job_id: JobId) -> Result<JobRecord, ChainError> {
        self.inner.read_job_inner(job_id)
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo, ChainError> {
        self.inner.token_info(token).await
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        Ok(self.inner.balance_of(token, account))
    }

    async fn submit(&self, call: EscrowCall) -> Result<TxHash, ChainError> {
        self.inner.submit_inner(Some(self.sender), call)
    }

    async fn deploy(&self, _bytecode: Bytes) -> Result<TxHash, ChainError> {
        self.inner.deploy_inner(Some(self.sender))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        self.inner.wait_inner(tx_hash)
    }
}
