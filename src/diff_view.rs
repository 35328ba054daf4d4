use crate::git::RepositoryReader;
use crate::model::CommitRecord;
use tracing::debug;

/// Full diff text for one commit plus the scroll position within it.
#[derive(Debug, Clone, Default)]
pub struct DiffViewer {
    text: String,
    line_count: usize,
    scroll: usize,
}

/// Diff text for `record` against its first parent (or the empty tree for a
/// root commit). The text is computed at most once per record; failures are
/// returned inline and are not cached.
pub fn load_diff<R: RepositoryReader + ?Sized>(reader: &R, record: &mut CommitRecord) -> String {
    if let Some(text) = record.cached_diff() {
        return text.to_string();
    }
    match reader.diff_text(record.first_parent(), &record.hash) {
        Ok(text) => {
            debug!(hash = %record.short_hash(), bytes = text.len(), "diff loaded");
            record.cache_diff(text).to_string()
        }
        Err(err) => {
            debug!(hash = %record.short_hash(), %err, "diff failed");
            format!("Error getting diff: {err}")
        }
    }
}

impl DiffViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` from the top.
    pub fn show(&mut self, text: String) {
        self.line_count = text.lines().count();
        self.text = text;
        self.scroll = 0;
    }

    pub fn open<R: RepositoryReader + ?Sized>(&mut self, reader: &R, record: &mut CommitRecord) {
        self.show(load_diff(reader, record));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.scroll = target.min(self.line_count);
    }

    pub fn page_down(&mut self, height: usize) {
        self.scroll_by(height.max(1) as isize);
    }

    pub fn page_up(&mut self, height: usize) {
        self.scroll_by(-(height.max(1) as isize));
    }

    /// Lines visible in a viewport of `height` rows at the current offset.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &str> {
        self.text.lines().skip(self.scroll).take(height)
    }
}
