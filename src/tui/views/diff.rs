use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel;
use crate::replay::ReplayEngine;

pub fn diff_line(text: &str) -> Line<'static> {
    let style = if text.starts_with("@@") {
        Style::default().fg(Color::Cyan)
    } else if text.starts_with('+') {
        Style::default().fg(Color::Green)
    } else if text.starts_with('-') {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text.to_string(), style))
}

/// Full-screen diff of the commit under the cursor.
pub fn draw_diff_view(f: &mut Frame, area: Rect, engine: &ReplayEngine) {
    let title = match engine.current() {
        Some(commit) => format!(
            "Diff {} ({}/{}) | q/Esc back, ←/→ commit, PgUp/PgDn scroll",
            commit.short_hash(),
            engine.cursor() + 1,
            engine.commits().len()
        ),
        None => "Diff".to_string(),
    };
    let block = panel(&title);
    let inner = block.inner(area);

    let viewer = engine.diff();
    let lines: Vec<Line> = viewer.visible(inner.height as usize).map(diff_line).collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}
