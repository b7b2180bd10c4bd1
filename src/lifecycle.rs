use std::{collections::HashMap, fmt};

use thiserror::Error;

use crate::types::JobId;

/// Escrow job status as stored by the contract. Transitions only ever move
/// forward, one step per write: `Created → Funded → Assigned → Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobStatus {
    Created,
    Funded,
    Assigned,
    Released,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "Created",
            JobStatus::Funded => "Funded",
            JobStatus::Assigned => "Assigned",
            JobStatus::Released => "Released",
        }
    }

    pub fn next(&self) -> Option<JobStatus> {
        match self {
            JobStatus::Created => Some(JobStatus::Funded),
            JobStatus::Funded => Some(JobStatus::Assigned),
            JobStatus::Assigned => Some(JobStatus::Released),
            JobStatus::Released => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Whether a single write can take a job from `self` to `target`.
    pub fn can_advance_to(&self, target: JobStatus) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for JobStatus {
    type Error = LifecycleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(JobStatus::Created),
            1 => Ok(JobStatus::Funded),
            2 => Ok(JobStatus::Assigned),
            3 => Ok(JobStatus::Released),
            other => Err(LifecycleError::UnknownStatus(other)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("unknown job status code {0}")]
    UnknownStatus(u8),

    #[error("job {id} went back from {from} to {to}")]
    Regressed {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    First(JobStatus),
    Unchanged(JobStatus),
    Advanced { from: JobStatus, to: JobStatus },
}

/// Remembers the last status seen for each job and rejects observations that
/// move backwards. Skipped steps are allowed since polling can miss them.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last_seen: HashMap<JobId, JobStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: JobId, status: JobStatus) -> Result<Observation, LifecycleError> {
        let Some(&previous) = self.last_seen.get(&id) else {
            self.last_seen.insert(id, status);
            return Ok(Observation::First(status));
        };

        if status < previous {
            return Err(LifecycleError::Regressed {
                id,
                from: previous,
                to: status,
            });
        }

        if status == previous {
            return Ok(Observation::Unchanged(status));
        }

        self.last_seen.insert(id, status);
        Ok(Observation::Advanced {
            from: previous,
            to: status,
        })
    }

    pub fn last_seen(&self, id: JobId) -> Option<JobStatus> {
        self.last_seen.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_decode() {
        assert_eq!(JobStatus::try_from(0), Ok(JobStatus::Created));
        assert_eq!(JobStatus::try_from(3), Ok(JobStatus::Released));
        assert_eq!(JobStatus::try_from(4), Err(LifecycleError::UnknownStatus(4)));
    }

    #[test]
    fn transitions_are_single_step_forward() {
        assert!(JobStatus::Created.can_advance_to(JobStatus::Funded));
        assert!(JobStatus::Funded.can_advance_to(JobStatus::Assigned));
        assert!(JobStatus::Assigned.can_advance_to(JobStatus::Released));
        assert!(!JobStatus::Created.can_advance_to(JobStatus::Assigned));
        assert!(!JobStatus::Funded.can_advance_to(JobStatus::Created));
        assert!(!JobStatus::Released.can_advance_to(JobStatus::Created));
        assert!(JobStatus::Released.is_terminal());
    }

    #[test]
    fn tracker_accepts_forward_progress() {
        let mut tracker = StatusTracker::new();
        let id = JobId(42);

        assert_eq!(
            tracker.observe(id, JobStatus::Created),
            Ok(Observation::First(JobStatus::Created))
        );
        assert_eq!(
            tracker.observe(id, JobStatus::Created),
            Ok(Observation::Unchanged(JobStatus::Created))
        );
        assert_eq!(
            tracker.observe(id, JobStatus::Assigned),
            Ok(Observation::Advanced {
                from: JobStatus::Created,
                to: JobStatus::Assigned
            })
        );
        assert_eq!(tracker.last_seen(id), Some(JobStatus::Assigned));
    }

    #[test]
    fn tracker_rejects_regression() {
        let mut tracker = StatusTracker::new();
        let id = JobId(42);
        tracker.observe(id, JobStatus::Assigned).unwrap();

        for earlier in [JobStatus::Created, JobStatus::Funded] {
            assert_eq!(
                tracker.observe(id, earlier),
                Err(LifecycleError::Regressed {
                    id,
                    from: JobStatus::Assigned,
                    to: earlier
                })
            );
        }
        assert_eq!(tracker.last_seen(id), Some(JobStatus::Assigned));

        // a different id is tracked independently
        assert!(tracker.observe(JobId(43), JobStatus::Created).is_ok());
    }
}
