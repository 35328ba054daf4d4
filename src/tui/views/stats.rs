use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel;
use crate::replay::{Phase, ReplayEngine};
use crate::stats::distinct_authors;

const LABEL_WIDTH: usize = 12;

fn labelled(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {label:<width$}", width = LABEL_WIDTH),
            Style::default().fg(Color::Indexed(250)),
        ),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Current commit, counters over `[0..=cursor]`, and replay status.
pub fn project_lines(engine: &ReplayEngine) -> Vec<Line<'static>> {
    let Some(commit) = engine.current() else {
        return vec![Line::from("  Loading commits...")];
    };

    let status = match engine.phase() {
        Phase::Replaying => "Replaying",
        _ => "Paused",
    };
    let loaded = if engine.loading_complete() { "" } else { " (loading)" };

    vec![
        labelled("Author:", commit.author.clone(), Color::Magenta),
        labelled(
            "Date:",
            commit.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            Color::Green,
        ),
        Line::from(""),
        labelled("Commits:", format!("{}", engine.cursor() + 1), Color::Cyan),
        labelled(
            "Authors:",
            format!("{}", distinct_authors(engine.visible())),
            Color::Cyan,
        ),
        labelled(
            "Additions:",
            format!("+{}", commit.cumulative.additions),
            Color::Green,
        ),
        labelled(
            "Deletions:",
            format!("-{}", commit.cumulative.deletions),
            Color::Red,
        ),
        labelled("Status:", format!("{status}{loaded}"), Color::Yellow),
    ]
}

pub fn draw_project_stats(f: &mut Frame, area: Rect, engine: &ReplayEngine) {
    let paragraph = Paragraph::new(project_lines(engine)).block(panel("Commit & Project Stats"));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::record;
    use crate::model::CommitLog;
    use crate::replay::{Event, Key};
    use crate::tui::views::testing::plain;
    use std::time::Duration;

    #[test]
    fn counters_follow_the_cursor() {
        let mut log = CommitLog::new();
        log.integrate(record("c1", &[], 0, 0));
        log.integrate(record("c2", &["c1"], 10, 2));
        log.integrate(record("c3", &["c2"], 0, 5));
        let mut engine = ReplayEngine::preloaded(log, Duration::from_millis(50));
        engine.update(Event::Key(Key::Left));

        let lines: Vec<String> = project_lines(&engine).iter().map(plain).collect();
        assert!(lines[0].ends_with("alice"));
        assert!(lines[1].ends_with("2024-03-04 10:00"));
        assert!(lines[3].ends_with("2"));
        assert!(lines[4].ends_with("1"));
        assert!(lines[5].ends_with("+10"));
        assert!(lines[6].ends_with("-2"));
        assert!(lines[7].ends_with("Paused"));
    }
}
