//! In-memory repository used by unit tests.

use super::RepositoryReader;
use crate::error::{Result, VisagitError};
use crate::model::{CommitMetadata, FileStats};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

#[derive(Default)]
pub(crate) struct FakeRepo {
    commits: Vec<(CommitMetadata, Vec<FileStats>)>,
    broken: HashSet<String>,
    unlistable: bool,
    diff_calls: Cell<usize>,
    stats_requests: RefCell<Vec<(Option<String>, String)>>,
}

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

impl FakeRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn commit(self, hash: &str, parents: &[&str], added: u32, deleted: u32) -> Self {
        self.commit_by(hash, parents, added, deleted, "alice", at(2024, 3, 4, 10))
    }

    pub(crate) fn commit_by(
        mut self,
        hash: &str,
        parents: &[&str],
        added: u32,
        deleted: u32,
        author: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        let meta = CommitMetadata {
            id: hash.to_string(),
            message: format!("commit {hash}"),
            author_name: author.to_string(),
            timestamp,
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        };
        let files = vec![FileStats {
            path: format!("{hash}.txt"),
            added_lines: added,
            deleted_lines: deleted,
        }];
        self.commits.push((meta, files));
        self
    }

    /// Metadata and diff lookups for `hash` fail from now on.
    pub(crate) fn broken(mut self, hash: &str) -> Self {
        self.broken.insert(hash.to_string());
        self
    }

    /// Listing history fails.
    pub(crate) fn unlistable(mut self) -> Self {
        self.unlistable = true;
        self
    }

    pub(crate) fn diff_calls(&self) -> usize {
        self.diff_calls.get()
    }

    pub(crate) fn stats_requests(&self) -> Vec<(Option<String>, String)> {
        self.stats_requests.borrow().clone()
    }

    fn find(&self, hash: &str) -> Result<&(CommitMetadata, Vec<FileStats>)> {
        if self.broken.contains(hash) {
            return Err(VisagitError::GitRepo(format!("cannot read {hash}")));
        }
        self.commits
            .iter()
            .find(|(meta, _)| meta.id == hash)
            .ok_or_else(|| VisagitError::GitRepo(format!("unknown commit {hash}")))
    }
}

impl RepositoryReader for FakeRepo {
    fn commit_hashes(&self) -> Result<Vec<String>> {
        if self.unlistable {
            return Err(VisagitError::GitRepo("history unavailable".to_string()));
        }
        Ok(self.commits.iter().map(|(meta, _)| meta.id.clone()).collect())
    }

    fn commit_metadata(&self, hash: &str) -> Result<CommitMetadata> {
        Ok(self.find(hash)?.0.clone())
    }

    fn diff_stats(&self, old: Option<&str>, new: &str) -> Result<Vec<FileStats>> {
        self.stats_requests
            .borrow_mut()
            .push((old.map(str::to_string), new.to_string()));
        Ok(self.find(new)?.1.clone())
    }

    fn diff_text(&self, old: Option<&str>, new: &str) -> Result<String> {
        self.diff_calls.set(self.diff_calls.get() + 1);
        let (_, files) = self.find(new)?;
        let mut out = format!("diff {}..{new}\n@@ -1 +1 @@\n", old.unwrap_or("root"));
        for file in files {
            out.push_str(&format!("+{} added\n-{} deleted\n", file.added_lines, file.deleted_lines));
        }
        Ok(out)
    }
}
