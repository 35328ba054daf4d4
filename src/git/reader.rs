use crate::error::Result;
use crate::model::{CommitMetadata, FileStats};

/// Read-only access to a repository's history, as consumed by ingestion and the diff viewer.
///
/// Trees are addressed through their commits: `old` is the commit whose tree is the
/// left-hand side of the diff, `None` meaning the empty tree.
pub trait RepositoryReader {
    /// Commit hashes reachable from `HEAD`, oldest first.
    fn commit_hashes(&self) -> Result<Vec<String>>;

    fn commit_metadata(&self, hash: &str) -> Result<CommitMetadata>;

    fn diff_stats(&self, old: Option<&str>, new: &str) -> Result<Vec<FileStats>>;

    /// Full unified diff text between two commits' trees.
    fn diff_text(&self, old: Option<&str>, new: &str) -> Result<String>;
}
