use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

mod changes;
mod dashboard;
mod developer;
mod diff;
mod help;
mod stats;
mod timeline;

pub use changes::draw_changes;
pub use dashboard::draw_dashboard;
pub use developer::{developer_lines, draw_developer_stats};
pub use diff::{diff_line, draw_diff_view};
pub use help::draw_help_overlay;
pub use stats::{draw_project_stats, project_lines};
pub use timeline::{draw_timeline, timeline_lines};

use super::draw::{label_style, panel_border_style};

/// Rounded panel with a centred `[ title ]` header.
pub(crate) fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(panel_border_style())
        .title(Span::styled(format!("[ {title} ]"), label_style()))
        .title_alignment(Alignment::Center)
}

/// A bold section heading inside a panel.
pub(crate) fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::Indexed(212))
            .add_modifier(Modifier::BOLD),
    ))
}
