use std::{fmt, str::FromStr};

use alloy::primitives::{Address, Bytes, Log, TxHash, U256};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::JobStatus;

/// Client-facing job identifier. The contract keys jobs by `uint256`, but ids
/// are chosen client-side and stay within `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    /// Millisecond timestamp id, used when the creator does not pick one.
    pub fn from_timestamp(now: DateTime<Utc>) -> Self {
        Self(now.timestamp_millis().max(1) as u64)
    }

    pub fn as_u256(&self) -> U256 {
        U256::from(self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u64 = s
            .trim()
            .parse()
            .with_context(|| format!("Invalid job ID '{s}'"))?;
        if id == 0 {
            return Err(anyhow!("Job ID must be a positive integer"));
        }
        Ok(Self(id))
    }
}

/// Raw `jobs(id)` return value, before existence checks and status decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRecord {
    pub id: U256,
    pub client: Address,
    pub freelancer: Address,
    pub amount: U256,
    pub token: Address,
    pub status: u8,
}

/// An on-chain job that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub client: Address,
    pub freelancer: Address,
    pub amount: U256,
    pub token: Address,
    pub status: JobStatus,
}

impl Job {
    pub fn has_freelancer(&self) -> bool {
        self.freelancer != Address::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

/// The parts of a mined transaction receipt the client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

/// Compiled contract artifact. Accepts both the Hardhat layout
/// (`"bytecode": "0x.."`) and the Foundry layout (`"bytecode": {"object": "0x.."}`).
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName", default)]
    pub contract_name: Option<String>,
    pub bytecode: ArtifactBytecode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArtifactBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl ContractArtifact {
    pub fn bytecode(&self) -> &Bytes {
        match &self.bytecode {
            ArtifactBytecode::Hex(code) => code,
            ArtifactBytecode::Object { object } => object,
        }
    }
}
