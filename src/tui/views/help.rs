use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::centered_rect;

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )])
}

/// Draw the modal help overlay listing key bindings.
pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let block = Block::default().title("Help").borders(Borders::ALL);
    let help_area = centered_rect(70, 80, area);

    f.render_widget(Clear, help_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "visagit - Help",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Replay:"),
        Line::from("  p / Space   Pause or resume auto-advance"),
        Line::from("  ← / h       Previous commit (pauses)"),
        Line::from("  → / l       Next commit (pauses)"),
        Line::from("  ↑ / k       Previous year in developer stats"),
        Line::from("  ↓ / j       Next year in developer stats"),
        Line::from("  g           Switch graph style"),
        Line::from("  Enter       Open diff (while paused)"),
        Line::from(""),
        section("Diff:"),
        Line::from("  ↑/k ↓/j     Scroll one line"),
        Line::from("  PgUp/PgDn   Scroll one page (Space also pages down)"),
        Line::from("  ← / →       Previous / next commit"),
        Line::from("  q/Esc/Enter Back to dashboard"),
        Line::from(""),
        section("General:"),
        Line::from("  ?, F1       Toggle this help"),
        Line::from("  q, Ctrl+C   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press '?' or 'Esc' to close this help",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(help_paragraph, help_area);
}
