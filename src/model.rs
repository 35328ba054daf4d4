use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Identity of a commit as read from the repository.
#[derive(Debug, Clone)]
pub struct CommitMetadata {
    pub id: String,
    pub message: String,
    pub author_name: String,
    pub timestamp: DateTime<FixedOffset>,
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: String,
    pub added_lines: u32,
    pub deleted_lines: u32,
}

/// Per-commit diff statistics against the first parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Fold per-file statistics; a path listed more than once counts as one file.
    pub fn from_files(files: &[FileStats]) -> Self {
        let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        paths.dedup();
        Self {
            files: paths.len(),
            additions: files.iter().map(|f| f.added_lines as usize).sum(),
            deletions: files.iter().map(|f| f.deleted_lines as usize).sum(),
        }
    }

    pub fn churn(&self) -> usize {
        self.additions + self.deletions
    }
}

/// Running totals up to and including a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cumulative {
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub parent_ids: Vec<String>,

    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
    pub churn: usize,

    pub cumulative: Cumulative,

    diff: Option<String>,
}

impl CommitRecord {
    pub fn new(meta: CommitMetadata, stats: DiffStats) -> Self {
        Self {
            hash: meta.id,
            message: meta.message,
            author: meta.author_name,
            timestamp: meta.timestamp,
            parent_ids: meta.parent_ids,
            files: stats.files,
            additions: stats.additions,
            deletions: stats.deletions,
            churn: stats.churn(),
            cumulative: Cumulative::default(),
            diff: None,
        }
    }

    pub fn short_hash(&self) -> &str {
        let end = self.hash.char_indices().nth(7).map(|(i, _)| i).unwrap_or(self.hash.len());
        &self.hash[..end]
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }

    pub fn cached_diff(&self) -> Option<&str> {
        self.diff.as_deref()
    }

    /// Store the diff text; a record keeps the first text it was given.
    pub fn cache_diff(&mut self, text: String) -> &str {
        self.diff.get_or_insert(text)
    }
}

/// Running maxima of per-commit additions and deletions over every integrated commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesExtremes {
    pub max_additions: usize,
    pub max_deletions: usize,
}

impl SeriesExtremes {
    pub fn observe(&mut self, record: &CommitRecord) {
        self.max_additions = self.max_additions.max(record.additions);
        self.max_deletions = self.max_deletions.max(record.deletions);
    }
}

/// The ordered list of integrated commits together with their extremes.
#[derive(Debug, Clone, Default)]
pub struct CommitLog {
    commits: Vec<CommitRecord>,
    extremes: SeriesExtremes,
}

impl CommitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly ingested record, deriving its cumulative fields from the
    /// previous record (or from zero for the first one). Returns its index.
    pub fn integrate(&mut self, mut record: CommitRecord) -> usize {
        let base = self.commits.last().map(|c| c.cumulative).unwrap_or_default();
        record.cumulative = Cumulative {
            files: base.files + record.files,
            additions: base.additions + record.additions,
            deletions: base.deletions + record.deletions,
        };
        self.extremes.observe(&record);
        self.commits.push(record);
        self.commits.len() - 1
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn get(&self, index: usize) -> Option<&CommitRecord> {
        self.commits.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CommitRecord> {
        self.commits.get_mut(index)
    }

    pub fn extremes(&self) -> SeriesExtremes {
        self.extremes
    }

    pub fn into_records(self) -> Vec<CommitRecord> {
        self.commits
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEntry {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
    pub churn: usize,
    pub cumulative_files: usize,
    pub cumulative_additions: usize,
    pub cumulative_deletions: usize,
}

impl From<&CommitRecord> for ExportEntry {
    fn from(record: &CommitRecord) -> Self {
        Self {
            hash: record.hash.clone(),
            message: record.message.clone(),
            author: record.author.clone(),
            date: record.timestamp,
            files: record.files,
            additions: record.additions,
            deletions: record.deletions,
            churn: record.churn,
            cumulative_files: record.cumulative.files,
            cumulative_additions: record.cumulative.additions,
            cumulative_deletions: record.cumulative.deletions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub entries: Vec<ExportEntry>,
}
