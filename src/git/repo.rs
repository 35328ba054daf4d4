use super::RepositoryReader;
use crate::error::{Result, VisagitError};
use crate::model::{CommitMetadata, FileStats};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::revision::walk::Sorting;
use gix::{discover, ObjectId, Repository};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

const BINARY_SNIFF_LEN: usize = 8192;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// One side-by-side file change, with tree entries already filtered out.
struct FilePair {
    old_path: Option<String>,
    new_path: Option<String>,
    old_id: Option<ObjectId>,
    new_id: Option<ObjectId>,
}

impl FilePair {
    fn from_change(change: ChangeDetached) -> Option<Self> {
        match change {
            ChangeDetached::Addition { location, entry_mode, id, .. } => {
                (!entry_mode.is_tree()).then(|| Self {
                    old_path: None,
                    new_path: Some(location.to_string()),
                    old_id: None,
                    new_id: Some(id),
                })
            }
            ChangeDetached::Deletion { location, entry_mode, id, .. } => {
                (!entry_mode.is_tree()).then(|| Self {
                    old_path: Some(location.to_string()),
                    new_path: None,
                    old_id: Some(id),
                    new_id: None,
                })
            }
            ChangeDetached::Modification {
                location,
                previous_id,
                entry_mode,
                id,
                ..
            } => (!entry_mode.is_tree()).then(|| Self {
                old_path: Some(location.to_string()),
                new_path: Some(location.to_string()),
                old_id: Some(previous_id),
                new_id: Some(id),
            }),
            ChangeDetached::Rewrite {
                source_location,
                source_id,
                entry_mode,
                location,
                id,
                ..
            } => (!entry_mode.is_tree()).then(|| Self {
                old_path: Some(source_location.to_string()),
                new_path: Some(location.to_string()),
                old_id: Some(source_id),
                new_id: Some(id),
            }),
        }
    }

    fn display_path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = discover(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_id(hash: &str) -> Result<ObjectId> {
        ObjectId::from_hex(hash.as_bytes())
            .map_err(|e| VisagitError::Parse(format!("Invalid commit ID '{hash}': {e}")))
    }

    fn file_pairs(&self, old: Option<&str>, new: &str) -> Result<Vec<FilePair>> {
        let new_tree = self.repo.find_commit(Self::parse_id(new)?)?.tree()?;
        let old_tree = match old {
            Some(hash) => Some(self.repo.find_commit(Self::parse_id(hash)?)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;

        Ok(changes.into_iter().filter_map(FilePair::from_change).collect())
    }

    fn blob(&self, id: Option<ObjectId>) -> Result<Vec<u8>> {
        match id {
            Some(id) => Ok(self.repo.find_object(id)?.data.clone()),
            None => Ok(Vec::new()),
        }
    }

    fn is_binary(data: &[u8]) -> bool {
        data.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
    }
}

impl RepositoryReader for GitRepo {
    fn commit_hashes(&self) -> Result<Vec<String>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        // Newest first by commit time; reversed below.
        let walk = self
            .repo
            .rev_walk([head_commit.id])
            .sorting(Sorting::ByCommitTime(Default::default()))
            .all()
            .map_err(|e| VisagitError::GitRepo(format!("Failed to start history walk: {e}")))?;

        let mut hashes = Vec::new();
        for info in walk {
            let info =
                info.map_err(|e| VisagitError::GitRepo(format!("Failed to walk history: {e}")))?;
            hashes.push(info.id.to_string());
        }

        hashes.reverse();
        Ok(hashes)
    }

    fn commit_metadata(&self, hash: &str) -> Result<CommitMetadata> {
        let commit = self.repo.find_commit(Self::parse_id(hash)?)?;

        let time = commit.time()?;
        let offset = FixedOffset::east_opt(time.offset).unwrap_or(Utc.fix());
        let timestamp = DateTime::from_timestamp(time.seconds, 0)
            .ok_or_else(|| VisagitError::InvalidDate(format!("Invalid timestamp: {}", time.seconds)))?
            .with_timezone(&offset);

        let author = commit.author()?;
        let message = commit.message()?;
        let mut text = message.title.to_string();
        if let Some(body) = message.body {
            text.push_str("\n\n");
            text.push_str(&body.to_string());
        }

        Ok(CommitMetadata {
            id: hash.to_string(),
            message: text,
            author_name: author.name.to_string(),
            timestamp,
            parent_ids: commit.parent_ids().map(|id| id.to_string()).collect(),
        })
    }

    fn diff_stats(&self, old: Option<&str>, new: &str) -> Result<Vec<FileStats>> {
        let mut files = Vec::new();
        for pair in self.file_pairs(old, new)? {
            let before = self.blob(pair.old_id)?;
            let after = self.blob(pair.new_id)?;
            let is_binary = Self::is_binary(&before) || Self::is_binary(&after);

            let (added_lines, deleted_lines) = if is_binary {
                (0, 0)
            } else {
                line_counts(&String::from_utf8_lossy(&before), &String::from_utf8_lossy(&after))
            };

            files.push(FileStats {
                path: pair.display_path().to_string(),
                added_lines,
                deleted_lines,
            });
        }
        Ok(files)
    }

    fn diff_text(&self, old: Option<&str>, new: &str) -> Result<String> {
        let mut out = String::new();
        for pair in self.file_pairs(old, new)? {
            let before = self.blob(pair.old_id)?;
            let after = self.blob(pair.new_id)?;

            let a = pair
                .old_path
                .as_ref()
                .map(|p| format!("a/{p}"))
                .unwrap_or_else(|| "/dev/null".to_string());
            let b = pair
                .new_path
                .as_ref()
                .map(|p| format!("b/{p}"))
                .unwrap_or_else(|| "/dev/null".to_string());

            let shown = pair.display_path();
            let source = pair.old_path.as_deref().unwrap_or(shown);
            out.push_str(&format!("diff --git a/{source} b/{shown}\n"));

            if Self::is_binary(&before) || Self::is_binary(&after) {
                out.push_str(&format!("Binary files {a} and {b} differ\n"));
                continue;
            }

            let before = String::from_utf8_lossy(&before);
            let after = String::from_utf8_lossy(&after);
            let diff = TextDiff::from_lines(&*before, &*after);
            out.push_str(&diff.unified_diff().context_radius(3).header(&a, &b).to_string());
        }
        Ok(out)
    }
}

fn line_counts(before: &str, after: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(before, after);
    let mut added = 0u32;
    let mut deleted = 0u32;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}
