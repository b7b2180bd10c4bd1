use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::types::JobId;

/// Off-chain display fields for a job. The contract stores none of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMeta {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub country: String,
    /// Display mirror of the on-chain amount, never authoritative.
    #[serde(rename = "valueUSDC")]
    pub value_usdc: f64,
    /// RFC 3339 timestamp, only used for ordering.
    pub created_at: String,
}

impl JobMeta {
    fn created_at_parsed(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Local key-value overlay of [`JobMeta`] records, one JSON array in one file.
///
/// Failures never reach the caller: an unreadable file or one that is not a
/// JSON array reads as empty, and failed writes are dropped. Entries that do
/// not parse as [`JobMeta`] are skipped on read but kept on disk, so a `put`
/// only ever replaces the entry with its own id. Problems are logged at
/// `warn`. There is no locking, concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct MetaStore {
    path: PathBuf,
}

impl MetaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: JobId) -> Option<JobMeta> {
        self.load().into_iter().find(|meta| meta.id == id)
    }

    /// Newest first. Records with an unparseable `createdAt` sort last.
    pub fn list(&self) -> Vec<JobMeta> {
        let mut metas = self.load();
        metas.sort_by_key(|meta| Reverse(meta.created_at_parsed()));
        metas
    }

    pub fn put(&self, meta: JobMeta) {
        let value = match serde_json::to_value(&meta) {
            Ok(value) => value,
            Err(e) => {
                warn!(job_id = %meta.id, error = %e, "Failed to serialize job metadata");
                return;
            }
        };

        let mut entries = self.load_entries();
        match entries.iter_mut().find(|entry| entry_id(entry) == Some(meta.id)) {
            Some(existing) => *existing = value,
            None => entries.push(value),
        }
        self.save(&entries);
    }

    fn load(&self) -> Vec<JobMeta> {
        self.load_entries()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<JobMeta>(entry) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping invalid job metadata entry");
                    None
                }
            })
            .collect()
    }

    fn load_entries(&self) -> Vec<Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return vec![],
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read job metadata");
                return vec![];
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!(path = %self.path.display(), "Job metadata is not a JSON array");
                vec![]
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse job metadata");
                vec![]
            }
        }
    }

    fn save(&self, entries: &[Value]) {
        let serialized = match serde_json::to_string_pretty(entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "Failed to serialize job metadata");
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "Failed to create metadata directory");
                return;
            }
        }

        if let Err(e) = fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %e, "Failed to write job metadata");
        }
    }
}

fn entry_id(entry: &Value) -> Option<JobId> {
    entry.get("id").and_then(Value::as_u64).map(JobId)
}
