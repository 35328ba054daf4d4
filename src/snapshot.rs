//! Pre-loaded commit records saved to disk, so a later pre-load can reuse
//! them and only compute commits it has not seen.

use crate::error::{Result, VisagitError};
use crate::model::{CommitMetadata, CommitRecord, DiffStats, SCHEMA_VERSION};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCommit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub parent_ids: Vec<String>,
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}

impl From<&CommitRecord> for SavedCommit {
    fn from(record: &CommitRecord) -> Self {
        Self {
            hash: record.hash.clone(),
            message: record.message.clone(),
            author: record.author.clone(),
            timestamp: record.timestamp,
            parent_ids: record.parent_ids.clone(),
            files: record.files,
            additions: record.additions,
            deletions: record.deletions,
        }
    }
}

impl SavedCommit {
    /// A fresh record; cumulative fields are filled in on integration.
    pub fn to_record(&self) -> CommitRecord {
        let meta = CommitMetadata {
            id: self.hash.clone(),
            message: self.message.clone(),
            author_name: self.author.clone(),
            timestamp: self.timestamp,
            parent_ids: self.parent_ids.clone(),
        };
        CommitRecord::new(
            meta,
            DiffStats {
                files: self.files,
                additions: self.additions,
                deletions: self.deletions,
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub commits: Vec<SavedCommit>,
}

impl Snapshot {
    pub fn new(repository_path: String, records: &[CommitRecord]) -> Self {
        Self {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository_path,
            commits: records.iter().map(SavedCommit::from).collect(),
        }
    }

    /// Read a snapshot; a missing file is `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        if snapshot.version != SCHEMA_VERSION {
            return Err(VisagitError::Snapshot(format!(
                "Schema version mismatch in {}: expected {}, found {}",
                path.display(),
                SCHEMA_VERSION,
                snapshot.version
            )));
        }
        Ok(Some(snapshot))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn by_hash(self) -> HashMap<String, SavedCommit> {
        self.commits
            .into_iter()
            .map(|commit| (commit.hash.clone(), commit))
            .collect()
    }
}
