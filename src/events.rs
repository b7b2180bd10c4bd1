use std::fmt;

use alloy::{
    primitives::{Address, Log, U256},
    sol_types::SolEvent,
};
use anyhow::{Context, Result};

use crate::{contracts::EscrowJobs, types::TxReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowEvent {
    Created {
        job_id: U256,
        client: Address,
        amount: U256,
        token: Address,
    },
    Funded {
        job_id: U256,
        client: Address,
        amount: U256,
    },
    Assigned {
        job_id: U256,
        freelancer: Address,
    },
    Released {
        job_id: U256,
        freelancer: Address,
        amount: U256,
    },
}

impl fmt::Display for EscrowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscrowEvent::Created {
                job_id,
                client,
                amount,
                token,
            } => write!(
                f,
                "JobCreated(job {job_id}, client {client}, amount {amount}, token {token})"
            ),
            EscrowEvent::Funded {
                job_id,
                client,
                amount,
            } => write!(f, "JobFunded(job {job_id}, client {client}, amount {amount})"),
            EscrowEvent::Assigned { job_id, freelancer } => {
                write!(f, "JobAssigned(job {job_id}, freelancer {freelancer})")
            }
            EscrowEvent::Released {
                job_id,
                freelancer,
                amount,
            } => write!(
                f,
                "PaymentReleased(job {job_id}, freelancer {freelancer}, amount {amount})"
            ),
        }
    }
}

/// Decodes a single log if it is one of the escrow events. Logs with other
/// signatures are skipped with `Ok(None)`.
pub fn decode_escrow_log(log: &Log) -> Result<Option<EscrowEvent>> {
    match log.topics().first() {
        Some(&EscrowJobs::JobCreated::SIGNATURE_HASH) => {
            let decoded = EscrowJobs::JobCreated::decode_log(log)
                .context("Failed to ABI decode JobCreated event data")?
                .data;

            Ok(Some(EscrowEvent::Created {
                job_id: decoded.jobId,
                client: decoded.client,
                amount: decoded.amount,
                token: decoded.token,
            }))
        }
        Some(&EscrowJobs::JobFunded::SIGNATURE_HASH) => {
            let decoded = EscrowJobs::JobFunded::decode_log(log)
                .context("Failed to ABI decode JobFunded event data")?
                .data;

            Ok(Some(EscrowEvent::Funded {
                job_id: decoded.jobId,
                client: decoded.client,
                amount: decoded.amount,
            }))
        }
        Some(&EscrowJobs::JobAssigned::SIGNATURE_HASH) => {
            let decoded = EscrowJobs::JobAssigned::decode_log(log)
                .context("Failed to ABI decode JobAssigned event data")?
                .data;

            Ok(Some(EscrowEvent::Assigned {
                job_id: decoded.jobId,
                freelancer: decoded.freelancer,
            }))
        }
        Some(&EscrowJobs::PaymentReleased::SIGNATURE_HASH) => {
            let decoded = EscrowJobs::PaymentReleased::decode_log(log)
                .context("Failed to ABI decode PaymentReleased event data")?
                .data;

            Ok(Some(EscrowEvent::Released {
                job_id: decoded.jobId,
                freelancer: decoded.freelancer,
                amount: decoded.amount,
            }))
        }
        _ => Ok(None),
    }
}

/// All escrow events emitted by the given escrow contract in a receipt.
pub fn decode_receipt(receipt: &TxReceipt, escrow: Address) -> Result<Vec<EscrowEvent>> {
    let mut events = vec![];
    for log in receipt.logs.iter().filter(|log| log.address == escrow) {
        if let Some(event) = decode_escrow_log(log)? {
            events.push(event);
        }
    }
    Ok(events)
}
