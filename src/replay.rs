//! The replay state machine. Events go in, effects come out; the loop driver
//! owns the clock, the terminal and the repository handle.

use crate::diff_view::DiffViewer;
use crate::error::VisagitError;
use crate::git::RepositoryReader;
use crate::ingest::Feed;
use crate::model::{CommitLog, CommitRecord, SeriesExtremes};
use crate::queue::Poll;
use crate::stats;
use crate::tui::graph::GraphStyle;
use std::time::Duration;
use tracing::{debug, info};

/// Keys the engine understands, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    Key(Key),
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScheduleTick(Duration),
    /// Load the diff of the commit under the cursor into the viewer.
    FetchDiff,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Diff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Replaying,
    Paused,
    DiffView,
}

/// Layout parameters derived from the terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    /// Columns available to the change graph inside its half-width panel.
    pub graph_columns: usize,
    /// Rows of diff text visible at once.
    pub diff_rows: usize,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            graph_columns: (width as usize / 2).saturating_sub(2),
            diff_rows: (height as usize).saturating_sub(3).max(1),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

pub struct ReplayEngine {
    log: CommitLog,
    cursor: usize,
    auto_advance: bool,
    tick_interval: Duration,
    mode: Mode,
    diff: DiffViewer,
    year: Option<i32>,
    graph_style: GraphStyle,
    show_help: bool,
    viewport: Viewport,
    loading_complete: bool,
    feed: Feed,
    fatal: Option<VisagitError>,
}

impl ReplayEngine {
    pub fn new(feed: Feed, auto_advance: bool, tick_interval: Duration) -> Self {
        Self {
            log: CommitLog::new(),
            cursor: 0,
            auto_advance,
            tick_interval,
            mode: Mode::Normal,
            diff: DiffViewer::new(),
            year: None,
            graph_style: GraphStyle::default(),
            show_help: false,
            viewport: Viewport::default(),
            loading_complete: false,
            feed,
            fatal: None,
        }
    }

    /// Start from records that were loaded up front: nothing left to
    /// ingest, auto-advance off, cursor on the newest commit.
    pub fn preloaded(log: CommitLog, tick_interval: Duration) -> Self {
        let cursor = log.len().saturating_sub(1);
        Self {
            log,
            cursor,
            loading_complete: true,
            ..Self::new(Feed::finished(), false, tick_interval)
        }
    }

    pub fn init(&self) -> Vec<Effect> {
        vec![Effect::ScheduleTick(self.tick_interval)]
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Tick => self.on_tick(),
            Event::Key(key) => self.on_key(key),
            Event::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                Vec::new()
            }
        }
    }

    /// Fulfil [`Effect::FetchDiff`]. Without a reader the viewer shows the error inline.
    pub fn load_diff<R: RepositoryReader + ?Sized>(&mut self, reader: Option<&R>) {
        let Some(record) = self.log.get_mut(self.cursor) else {
            return;
        };
        match reader {
            Some(reader) => self.diff.open(reader, record),
            None => self
                .diff
                .show("Error getting diff: repository unavailable".to_string()),
        }
    }

    /// The error that ended ingestion, once [`Effect::Quit`] has been emitted for it.
    pub fn take_fatal(&mut self) -> Option<VisagitError> {
        self.fatal.take()
    }

    fn on_tick(&mut self) -> Vec<Effect> {
        if let Some(err) = self.feed.take_fatal() {
            info!(%err, "stopping replay after ingestion failure");
            self.fatal = Some(err);
            return vec![Effect::Quit];
        }

        if self.auto_advance {
            match self.feed.try_next() {
                Poll::Item(record) => self.cursor = self.log.integrate(record),
                Poll::Empty => {}
                Poll::Finished => {
                    if !self.loading_complete {
                        debug!(commits = self.log.len(), "all commits loaded");
                    }
                    self.loading_complete = true;
                }
            }
        }
        vec![Effect::ScheduleTick(self.tick_interval)]
    }

    fn on_key(&mut self, key: Key) -> Vec<Effect> {
        if key == Key::Ctrl('c') {
            return vec![Effect::Quit];
        }
        if self.show_help {
            match key {
                Key::Char('q') => return vec![Effect::Quit],
                Key::Char('?') | Key::F(1) | Key::Esc => self.show_help = false,
                _ => {}
            }
            return Vec::new();
        }
        match self.mode {
            Mode::Normal => self.on_normal_key(key),
            Mode::Diff => self.on_diff_key(key),
        }
    }

    fn on_normal_key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Char('q') => return vec![Effect::Quit],
            Key::Right | Key::Char('l') => {
                self.step(true);
            }
            Key::Left | Key::Char('h') => {
                self.step(false);
            }
            Key::Up | Key::Char('k') => self.cycle_year(false),
            Key::Down | Key::Char('j') => self.cycle_year(true),
            Key::Char('p') | Key::Char(' ') => self.auto_advance = !self.auto_advance,
            Key::Char('g') => self.graph_style = self.graph_style.toggled(),
            Key::Char('?') | Key::F(1) => self.show_help = true,
            Key::Enter if !self.auto_advance && !self.log.is_empty() => {
                self.mode = Mode::Diff;
                return vec![Effect::FetchDiff];
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_diff_key(&mut self, key: Key) -> Vec<Effect> {
        let page = self.viewport.diff_rows;
        match key {
            Key::Char('q') | Key::Esc | Key::Enter => self.mode = Mode::Normal,
            Key::Up | Key::Char('k') => self.diff.scroll_by(-1),
            Key::Down | Key::Char('j') => self.diff.scroll_by(1),
            Key::PageUp => self.diff.page_up(page),
            Key::PageDown | Key::Char(' ') => self.diff.page_down(page),
            Key::Right | Key::Char('l') => {
                if self.step(true) {
                    return vec![Effect::FetchDiff];
                }
            }
            Key::Left | Key::Char('h') => {
                if self.step(false) {
                    return vec![Effect::FetchDiff];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    /// Move the cursor one commit; returns whether it moved. Always pauses.
    fn step(&mut self, forward: bool) -> bool {
        self.auto_advance = false;
        let last = self.log.len().saturating_sub(1);
        let target = if forward {
            (self.cursor + 1).min(last)
        } else {
            self.cursor.saturating_sub(1)
        };
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    fn cycle_year(&mut self, forward: bool) {
        let choices = stats::year_choices(self.visible());
        self.year = stats::cycle_year(&choices, self.year, forward);
    }

    pub fn commits(&self) -> &[CommitRecord] {
        self.log.commits()
    }

    /// Commits up to and including the cursor.
    pub fn visible(&self) -> &[CommitRecord] {
        let commits = self.log.commits();
        if commits.is_empty() {
            commits
        } else {
            &commits[..=self.cursor]
        }
    }

    pub fn current(&self) -> Option<&CommitRecord> {
        self.log.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        match self.mode {
            Mode::Diff => Phase::DiffView,
            Mode::Normal if self.log.is_empty() => Phase::Loading,
            Mode::Normal if self.auto_advance => Phase::Replaying,
            Mode::Normal => Phase::Paused,
        }
    }

    pub fn extremes(&self) -> SeriesExtremes {
        self.log.extremes()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn graph_style(&self) -> GraphStyle {
        self.graph_style
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn loading_complete(&self) -> bool {
        self.loading_complete
    }

    pub fn diff(&self) -> &DiffViewer {
        &self.diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::{at, FakeRepo};
    use crate::ingest::{self, ingest_commit};
    use crate::model::tests::record;
    use crate::queue::{handoff, Producer};
    use pretty_assertions::assert_eq;
    use std::sync::mpsc::{self, Sender};

    const TICK: Duration = Duration::from_millis(50);

    struct Harness {
        engine: ReplayEngine,
        producer: Option<Producer<CommitRecord>>,
        fatal: Sender<VisagitError>,
    }

    impl Harness {
        fn new(auto: bool) -> Self {
            let (producer, consumer) = handoff(8);
            let (fatal, fatal_rx) = mpsc::channel();
            Self {
                engine: ReplayEngine::new(Feed::new(consumer, fatal_rx), auto, TICK),
                producer: Some(producer),
                fatal,
            }
        }

        fn push(&self, rec: CommitRecord) {
            self.producer.as_ref().unwrap().push(rec).unwrap();
        }

        fn finish(&mut self) {
            self.producer = None;
        }

        fn tick(&mut self) -> Vec<Effect> {
            self.engine.update(Event::Tick)
        }

        fn key(&mut self, key: Key) -> Vec<Effect> {
            self.engine.update(Event::Key(key))
        }
    }

    fn loaded(n: usize) -> ReplayEngine {
        let mut log = CommitLog::new();
        for i in 0..n {
            log.integrate(record(&format!("c{i}"), &["p"], i, 1));
        }
        ReplayEngine::preloaded(log, TICK)
    }

    #[test]
    fn init_schedules_first_tick() {
        assert_eq!(Harness::new(true).engine.init(), vec![Effect::ScheduleTick(TICK)]);
    }

    #[test]
    fn ticks_integrate_one_record_each() {
        let mut h = Harness::new(true);
        assert_eq!(h.engine.phase(), Phase::Loading);
        h.push(record("c1", &[], 0, 0));
        h.push(record("c2", &["c1"], 10, 2));
        h.push(record("c3", &["c2"], 0, 5));

        for expected in 0..3 {
            assert_eq!(h.tick(), vec![Effect::ScheduleTick(TICK)]);
            assert_eq!(h.engine.cursor(), expected);
        }
        assert_eq!(h.engine.phase(), Phase::Replaying);
        let totals: Vec<(usize, usize)> = h
            .engine
            .commits()
            .iter()
            .map(|c| (c.cumulative.additions, c.cumulative.deletions))
            .collect();
        assert_eq!(totals, vec![(0, 0), (10, 2), (10, 7)]);
        assert_eq!(
            h.engine.extremes(),
            SeriesExtremes { max_additions: 10, max_deletions: 5 }
        );
    }

    #[test]
    fn empty_queue_changes_nothing_and_end_of_stream_completes_loading() {
        let mut h = Harness::new(true);
        assert_eq!(h.tick(), vec![Effect::ScheduleTick(TICK)]);
        assert!(h.engine.commits().is_empty());
        assert!(!h.engine.loading_complete());

        h.push(record("c1", &[], 0, 0));
        h.finish();
        h.tick();
        assert!(!h.engine.loading_complete());
        assert_eq!(h.tick(), vec![Effect::ScheduleTick(TICK)]);
        assert!(h.engine.loading_complete());
        assert!(h.engine.auto_advance());
    }

    #[test]
    fn paused_engine_does_not_drain() {
        let mut h = Harness::new(false);
        h.push(record("c1", &[], 0, 0));
        assert_eq!(h.tick(), vec![Effect::ScheduleTick(TICK)]);
        assert!(h.engine.commits().is_empty());
    }

    #[test]
    fn fatal_error_quits_even_when_paused() {
        let mut h = Harness::new(false);
        h.fatal
            .send(VisagitError::GitRepo("not a repository".to_string()))
            .unwrap();
        assert_eq!(h.tick(), vec![Effect::Quit]);
        let err = h.engine.take_fatal().unwrap();
        assert!(err.to_string().contains("not a repository"));
    }

    #[test]
    fn toggle_only_flips_the_flag() {
        let mut engine = loaded(4);
        engine.update(Event::Key(Key::Left));
        let (cursor, len) = (engine.cursor(), engine.commits().len());

        engine.update(Event::Key(Key::Char('p')));
        assert!(engine.auto_advance());
        engine.update(Event::Key(Key::Char(' ')));
        assert!(!engine.auto_advance());
        assert_eq!((engine.cursor(), engine.commits().len()), (cursor, len));
    }

    #[test]
    fn navigation_is_bounded_and_pauses() {
        let mut engine = loaded(3);
        assert_eq!(engine.cursor(), 2);
        engine.update(Event::Key(Key::Char('p')));
        engine.update(Event::Key(Key::Right));
        assert_eq!(engine.cursor(), 2);
        assert!(!engine.auto_advance());

        engine.update(Event::Key(Key::Char('h')));
        engine.update(Event::Key(Key::Left));
        engine.update(Event::Key(Key::Left));
        assert_eq!(engine.cursor(), 0);
        engine.update(Event::Key(Key::Char('l')));
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.visible().len(), 2);
    }

    #[test]
    fn enter_only_opens_diff_when_paused() {
        let mut engine = loaded(2);
        engine.update(Event::Key(Key::Char('p')));
        assert_eq!(engine.update(Event::Key(Key::Enter)), Vec::new());
        assert_eq!(engine.mode(), Mode::Normal);

        engine.update(Event::Key(Key::Char('p')));
        assert_eq!(engine.update(Event::Key(Key::Enter)), vec![Effect::FetchDiff]);
        assert_eq!(engine.phase(), Phase::DiffView);
    }

    #[test]
    fn enter_does_nothing_without_commits() {
        let mut h = Harness::new(false);
        assert_eq!(h.key(Key::Enter), Vec::new());
        assert_eq!(h.engine.mode(), Mode::Normal);
    }

    #[test]
    fn leaving_diff_restores_cursor_and_flag() {
        let repo = FakeRepo::new()
            .commit("a", &[], 0, 0)
            .commit("b", &["a"], 2, 1);
        let mut log = CommitLog::new();
        for hash in ["a", "b"] {
            log.integrate(ingest_commit(&repo, hash).unwrap());
        }
        let mut engine = ReplayEngine::preloaded(log, TICK);

        for exit in [Key::Esc, Key::Char('q'), Key::Enter] {
            assert_eq!(engine.update(Event::Key(Key::Enter)), vec![Effect::FetchDiff]);
            engine.load_diff(Some(&repo));
            engine.update(Event::Key(Key::Down));
            assert_eq!(engine.update(Event::Key(exit)), Vec::new());
            assert_eq!(engine.mode(), Mode::Normal);
            assert_eq!(engine.cursor(), 1);
            assert!(!engine.auto_advance());
        }
        assert_eq!(repo.diff_calls(), 1);
    }

    #[test]
    fn diff_navigation_refetches_and_resets_scroll() {
        let repo = FakeRepo::new()
            .commit("a", &[], 0, 0)
            .commit("b", &["a"], 2, 1);
        let feed = ingest::spawn(
            || {
                Ok(FakeRepo::new()
                    .commit("a", &[], 0, 0)
                    .commit("b", &["a"], 2, 1))
            },
            None,
        )
        .unwrap();
        let mut log = CommitLog::new();
        for rec in ingest::drain(feed).unwrap() {
            log.integrate(rec);
        }
        let mut engine = ReplayEngine::preloaded(log, TICK);

        engine.update(Event::Key(Key::Enter));
        engine.load_diff(Some(&repo));
        engine.update(Event::Key(Key::Char('j')));
        assert_eq!(engine.diff().scroll(), 1);

        assert_eq!(engine.update(Event::Key(Key::Left)), vec![Effect::FetchDiff]);
        engine.load_diff(Some(&repo));
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.diff().scroll(), 0);
        assert!(engine.diff().text().starts_with("diff root..a"));

        assert_eq!(engine.update(Event::Key(Key::Left)), Vec::new());
        assert_eq!(engine.mode(), Mode::Diff);
    }

    #[test]
    fn diff_without_reader_shows_inline_error() {
        let mut engine = loaded(1);
        engine.update(Event::Key(Key::Enter));
        engine.load_diff::<FakeRepo>(None);
        assert!(engine.diff().text().starts_with("Error getting diff"));
        assert_eq!(engine.current().unwrap().cached_diff(), None);
    }

    #[test]
    fn diff_paging_uses_viewport_height() {
        let mut engine = loaded(1);
        engine.update(Event::Resize { width: 100, height: 13 });
        engine.update(Event::Key(Key::Enter));
        let repo = FakeRepo::new();
        engine.load_diff(Some(&repo));
        // Unknown commit: the inline error is a single line.
        engine.update(Event::Key(Key::PageDown));
        assert_eq!(engine.diff().scroll(), 1);
        assert_eq!(engine.viewport().diff_rows, 10);
    }

    #[test]
    fn year_cycle_covers_visible_years() {
        let mut log = CommitLog::new();
        let repo = FakeRepo::new()
            .commit_by("a", &[], 0, 0, "alice", at(2022, 5, 1, 9))
            .commit_by("b", &["a"], 1, 0, "bob", at(2023, 5, 1, 9))
            .commit_by("c", &["b"], 1, 0, "bob", at(2024, 5, 1, 9));
        for hash in ["a", "b", "c"] {
            log.integrate(ingest_commit(&repo, hash).unwrap());
        }
        let mut engine = ReplayEngine::preloaded(log, TICK);

        let mut seen = Vec::new();
        for _ in 0..4 {
            engine.update(Event::Key(Key::Down));
            seen.push(engine.year());
        }
        assert_eq!(seen, vec![Some(2024), Some(2023), Some(2022), None]);
        engine.update(Event::Key(Key::Up));
        assert_eq!(engine.year(), Some(2022));

        // Only years up to the cursor are offered.
        engine.update(Event::Key(Key::Left));
        engine.update(Event::Key(Key::Left));
        engine.update(Event::Key(Key::Down));
        assert_eq!(engine.year(), None);
    }

    #[test]
    fn resize_only_touches_viewport() {
        let mut engine = loaded(3);
        let before = (engine.cursor(), engine.auto_advance(), engine.mode());
        assert_eq!(engine.update(Event::Resize { width: 120, height: 40 }), Vec::new());
        assert_eq!(engine.viewport(), Viewport::new(120, 40));
        assert_eq!(engine.viewport().graph_columns, 58);
        assert_eq!((engine.cursor(), engine.auto_advance(), engine.mode()), before);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut engine = loaded(3);
        engine.update(Event::Key(Key::Char('?')));
        assert!(engine.show_help());
        engine.update(Event::Key(Key::Left));
        assert_eq!(engine.cursor(), 2);
        engine.update(Event::Key(Key::Esc));
        assert!(!engine.show_help());
        engine.update(Event::Key(Key::F(1)));
        assert_eq!(engine.update(Event::Key(Key::Ctrl('c'))), vec![Effect::Quit]);
    }

    #[test]
    fn quit_keys() {
        let mut engine = loaded(1);
        assert_eq!(engine.update(Event::Key(Key::Char('q'))), vec![Effect::Quit]);
        engine.update(Event::Key(Key::Enter));
        assert_eq!(engine.update(Event::Key(Key::Ctrl('c'))), vec![Effect::Quit]);
    }

    #[test]
    fn graph_style_key_toggles_rendering_only() {
        let mut engine = loaded(2);
        engine.update(Event::Key(Key::Char('g')));
        assert_eq!(engine.graph_style(), GraphStyle::Bars);
        assert_eq!(engine.cursor(), 1);
    }
}
