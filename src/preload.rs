//! Compute every commit record up front on a worker pool, before the
//! interactive session starts.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, VisagitError};
use crate::git::{GitRepo, RepositoryReader};
use crate::ingest::ingest_commit;
use crate::model::{CommitLog, CommitRecord};
use crate::snapshot::{SavedCommit, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadReport {
    pub commits: usize,
    pub skipped: usize,
    pub resumed: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

impl PreloadReport {
    pub fn summary(&self) -> String {
        let elapsed = Duration::from_millis(self.elapsed.as_millis() as u64);
        let resumed = if self.resumed > 0 {
            format!(", {} resumed", self.resumed)
        } else {
            String::new()
        };
        format!(
            "Pre-loaded {} commits ({} skipped{}) with {} workers in {}",
            self.commits,
            self.skipped,
            resumed,
            self.workers,
            humantime::format_duration(elapsed)
        )
    }
}

/// Result of [`collect_parallel`].
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<CommitRecord>,
    /// Hashes looked at, including the ones that failed.
    pub attempted: usize,
    /// Records taken from a saved report instead of the repository.
    pub resumed: usize,
}

/// Worker threads to use: `requested`, or 75% of the CPUs when 0.
pub fn worker_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        (num_cpus::get() * 3 / 4).max(1)
    }
}

/// Keep `pct` percent of `hashes`, evenly spread and in order. 0 and 100 keep all.
pub fn sample(hashes: Vec<String>, pct: u8) -> Vec<String> {
    if pct == 0 || pct >= 100 {
        return hashes;
    }
    let pct = pct as usize;
    hashes
        .into_iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) * pct / 100 > i * pct / 100)
        .map(|(_, hash)| hash)
        .collect()
}

fn progress_bar(visible: bool) -> ProgressBar {
    let pb = ProgressBar::new(0);
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} commits ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Records for `hashes`, in the same order, computed on `workers` threads.
/// Each worker opens its own reader; commits that fail are left out, and
/// commits found in `known` are reused. At most `limit` records are
/// returned; failures do not count against it.
pub fn collect_parallel<R, F>(
    hashes: &[String],
    open: F,
    workers: usize,
    limit: Option<usize>,
    known: &HashMap<String, SavedCommit>,
    progress: &ProgressBar,
) -> Result<Collected>
where
    R: RepositoryReader,
    F: Fn() -> Result<R> + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("visagit-preload-{i}"))
        .build()
        .map_err(|e| VisagitError::Other(format!("Failed to start worker pool: {e}")))?;

    let mut collected = Collected::default();
    let mut rest = hashes;
    while !rest.is_empty() {
        let wanted = limit.map_or(rest.len(), |limit| limit - collected.records.len());
        if wanted == 0 {
            break;
        }
        let (batch, tail) = rest.split_at(wanted.min(rest.len()));
        rest = tail;
        progress.inc_length(batch.len() as u64);

        let results: Vec<Option<(CommitRecord, bool)>> = pool.install(|| {
            batch
                .par_iter()
                .map_init(
                    || open().map_err(|err| warn!(%err, "worker could not open repository")),
                    |reader, hash| {
                        let record = match (known.get(hash), reader) {
                            (Some(saved), _) => Some((saved.to_record(), true)),
                            (None, Ok(reader)) => ingest_commit(&*reader, hash)
                                .map_err(|err| debug!(%hash, %err, "skipping commit"))
                                .ok()
                                .map(|record| (record, false)),
                            (None, Err(())) => None,
                        };
                        progress.inc(1);
                        record
                    },
                )
                .collect()
        });

        collected.attempted += batch.len();
        for (record, resumed) in results.into_iter().flatten() {
            collected.resumed += usize::from(resumed);
            collected.records.push(record);
        }
    }
    Ok(collected)
}

/// Load the (sampled, limited) history of `config.repo_path` in parallel,
/// reusing and then updating `config.report_file` when one is set.
pub fn preload(config: &Config, show_progress: bool) -> Result<(CommitLog, PreloadReport)> {
    let start = Instant::now();
    let repo = GitRepo::open(&config.repo_path)?;
    let hashes = sample(repo.commit_hashes()?, config.sample_pct);
    let path = repo.path().to_path_buf();
    let workers = worker_count(config.workers);

    let known = match &config.report_file {
        Some(file) => Snapshot::load(file)?
            .map(Snapshot::by_hash)
            .unwrap_or_default(),
        None => HashMap::new(),
    };
    info!(
        commits = hashes.len(),
        sample_pct = config.sample_pct,
        saved = known.len(),
        workers,
        "pre-load started"
    );

    let pb = progress_bar(show_progress);
    let collected = collect_parallel(
        &hashes,
        || GitRepo::open(&path),
        workers,
        config.commit_limit,
        &known,
        &pb,
    )?;
    pb.finish_and_clear();

    let mut log = CommitLog::new();
    for record in collected.records {
        log.integrate(record);
    }

    if let Some(file) = &config.report_file {
        Snapshot::new(path.to_string_lossy().to_string(), log.commits()).save(file)?;
        debug!(file = %file.display(), "report saved");
    }

    let report = PreloadReport {
        commits: log.len(),
        skipped: collected.attempted - log.len(),
        resumed: collected.resumed,
        workers,
        elapsed: start.elapsed(),
    };
    info!(commits = report.commits, skipped = report.skipped, resumed = report.resumed, elapsed = ?report.elapsed, "pre-load finished");
    Ok((log, report))
}
