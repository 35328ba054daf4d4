use ratatui::Frame;
use tracing::warn;

use super::views::draw_dashboard;
use crate::config::Config;
use crate::error::{Result, VisagitError};
use crate::git::{GitRepo, RepositoryReader};
use crate::ingest;
use crate::model::CommitLog;
use crate::replay::{Effect, Event, ReplayEngine};

/// The interactive session: the replay engine plus the repository handle
/// used to materialise diffs on the UI thread.
pub struct Dashboard<R> {
    engine: ReplayEngine,
    reader: Option<R>,
}

impl Dashboard<GitRepo> {
    /// Start streaming ingestion for `config` and open a second handle for diffs.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.repo_path.clone();
        let feed = ingest::spawn(move || GitRepo::open(path), config.commit_limit)?;
        let engine = ReplayEngine::new(feed, config.auto_progress, config.tick_interval());
        Ok(Self::new(engine, Self::diff_reader(config)))
    }

    /// Start from a log that was loaded up front.
    pub fn preloaded(config: &Config, log: CommitLog) -> Self {
        let engine = ReplayEngine::preloaded(log, config.tick_interval());
        Self::new(engine, Self::diff_reader(config))
    }

    // Open failures reach the user through the ingestion feed instead.
    fn diff_reader(config: &Config) -> Option<GitRepo> {
        GitRepo::open(&config.repo_path)
            .map_err(|err| warn!(%err, "diffs unavailable"))
            .ok()
    }
}

impl<R: RepositoryReader> Dashboard<R> {
    pub fn new(engine: ReplayEngine, reader: Option<R>) -> Self {
        Self { engine, reader }
    }

    pub fn init(&self) -> Vec<Effect> {
        self.engine.init()
    }

    /// Apply `event`, fulfilling diff fetches in place. The remaining
    /// effects are for the loop driver.
    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = self.engine.update(event);
        effects.retain(|effect| {
            if *effect == Effect::FetchDiff {
                self.engine.load_diff(self.reader.as_ref());
                false
            } else {
                true
            }
        });
        effects
    }

    pub fn view(&self, f: &mut Frame) {
        let area = f.size();
        draw_dashboard(f, area, &self.engine);
    }

    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    pub fn take_fatal(&mut self) -> Option<VisagitError> {
        self.engine.take_fatal()
    }
}
