use crate::error::{Result, VisagitError};
use crate::git::RepositoryReader;
use crate::model::{CommitLog, CommitRecord, DiffStats};
use crate::queue::{handoff, Consumer, Poll, Producer, DEFAULT_CAPACITY};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{debug, error, info};

/// The UI side of an ingestion run: records plus at most one fatal error.
pub struct Feed {
    records: Consumer<CommitRecord>,
    fatal: Receiver<VisagitError>,
}

impl Feed {
    pub fn new(records: Consumer<CommitRecord>, fatal: Receiver<VisagitError>) -> Self {
        Self { records, fatal }
    }

    /// A feed with nothing left to deliver, for sessions that were pre-loaded.
    pub fn finished() -> Self {
        let (_, fatal) = mpsc::channel();
        Self::new(Consumer::closed(), fatal)
    }

    pub fn try_next(&self) -> Poll<CommitRecord> {
        self.records.try_pop()
    }

    pub fn take_fatal(&self) -> Option<VisagitError> {
        self.fatal.try_recv().ok()
    }
}

/// Build the record for one commit, diffing against its first parent only.
/// Root commits contribute zero to every statistic.
pub fn ingest_commit<R: RepositoryReader + ?Sized>(reader: &R, hash: &str) -> Result<CommitRecord> {
    let meta = reader.commit_metadata(hash)?;
    let stats = match meta.parent_ids.first() {
        Some(parent) => DiffStats::from_files(&reader.diff_stats(Some(parent), hash)?),
        None => DiffStats::default(),
    };
    Ok(CommitRecord::new(meta, stats))
}

/// Start ingestion on a dedicated thread. `open` runs on that thread, so the
/// repository handle never crosses threads. `limit` caps the number of
/// records delivered; commits that fail to load do not count against it.
pub fn spawn<R, F>(open: F, limit: Option<usize>) -> Result<Feed>
where
    R: RepositoryReader,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    let (producer, consumer) = handoff(DEFAULT_CAPACITY);
    let (fatal_tx, fatal_rx) = mpsc::channel();

    thread::Builder::new()
        .name("visagit-ingest".to_string())
        .spawn(move || {
            if let Err(err) = run(open, limit, &producer) {
                error!(%err, "ingestion aborted");
                let _ = fatal_tx.send(err);
            }
        })?;

    Ok(Feed::new(consumer, fatal_rx))
}

fn run<R, F>(open: F, limit: Option<usize>, producer: &Producer<CommitRecord>) -> Result<()>
where
    R: RepositoryReader,
    F: FnOnce() -> Result<R>,
{
    let reader = open()?;
    let hashes = reader.commit_hashes()?;
    info!(commits = hashes.len(), ?limit, "ingestion started");

    let mut sent = 0usize;
    for hash in &hashes {
        if limit.is_some_and(|limit| sent >= limit) {
            break;
        }
        match ingest_commit(&reader, hash) {
            Ok(record) => {
                if producer.push(record).is_err() {
                    debug!("consumer dropped, stopping ingestion");
                    return Ok(());
                }
                sent += 1;
            }
            Err(err) => debug!(%hash, %err, "skipping commit"),
        }
    }

    info!(commits = sent, "ingestion finished");
    Ok(())
}

/// Consume a feed to completion, integrating records in arrival order.
pub fn drain(feed: Feed) -> Result<Vec<CommitRecord>> {
    let mut log = CommitLog::new();
    while let Some(record) = feed.records.pop() {
        log.integrate(record);
    }
    match feed.take_fatal() {
        Some(err) => Err(err),
        None => Ok(log.into_records()),
    }
}
