use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{
    draw_changes, draw_developer_stats, draw_diff_view, draw_help_overlay, draw_project_stats,
    draw_timeline, panel,
};
use crate::replay::{Mode, ReplayEngine};
use crate::tui::layout::dashboard_areas;

/// Render the whole screen for the engine's current state.
pub fn draw_dashboard(f: &mut Frame, area: Rect, engine: &ReplayEngine) {
    if engine.mode() == Mode::Diff {
        draw_diff_view(f, area, engine);
    } else if engine.commits().is_empty() {
        f.render_widget(
            Paragraph::new("Loading commits...").block(panel("visagit")),
            area,
        );
    } else {
        let areas = dashboard_areas(area);
        draw_project_stats(f, areas.stats, engine);
        draw_changes(f, areas.changes, engine);
        draw_timeline(f, areas.timeline, engine.commits(), engine.cursor());
        draw_developer_stats(f, areas.developer, engine);
    }

    if engine.show_help() {
        draw_help_overlay(f, area);
    }
}
