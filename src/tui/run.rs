use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::Show;
use crossterm::event::{poll, read};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use super::app::Dashboard;
use super::events::translate;
use crate::error::Result;
use crate::git::RepositoryReader;
use crate::replay::{Effect, Event};

type Term = Terminal<CrosstermBackend<Stdout>>;

const IDLE_POLL: Duration = Duration::from_millis(200);

/// Raw mode and the alternate screen, undone on drop whatever happens
/// after entering.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
    }
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)
}

/// Run the interactive session until the user quits or ingestion fails.
/// The terminal is restored before any error is returned.
pub fn run<R: RepositoryReader>(mut dashboard: Dashboard<R>) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let outcome = event_loop(&mut terminal, &mut dashboard);
    drop(guard);

    outcome?;
    match dashboard.take_fatal() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn event_loop<R: RepositoryReader>(terminal: &mut Term, dashboard: &mut Dashboard<R>) -> Result<()> {
    let size = terminal.size()?;
    let mut pending = dashboard.update(Event::Resize {
        width: size.width,
        height: size.height,
    });
    pending.extend(dashboard.init());
    let mut next_tick: Option<Instant> = None;

    loop {
        for effect in pending.drain(..) {
            match effect {
                Effect::ScheduleTick(interval) => next_tick = Some(Instant::now() + interval),
                Effect::Quit => {
                    info!("session ended");
                    return Ok(());
                }
                Effect::FetchDiff => {}
            }
        }

        terminal.draw(|f| dashboard.view(f))?;

        let timeout = next_tick
            .map(|t| t.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        if poll(timeout)? {
            if let Some(event) = translate(read()?) {
                pending.extend(dashboard.update(event));
            }
        }

        if next_tick.is_some_and(|t| Instant::now() >= t) {
            next_tick = None;
            pending.extend(dashboard.update(Event::Tick));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_restores_main_screen_and_cursor() {
        let mut out = Vec::new();
        leave_screen(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}[?1049l"));
        assert!(text.contains("\u{1b}[?25h"));
    }
}
