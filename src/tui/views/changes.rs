use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel;
use crate::replay::ReplayEngine;
use crate::tui::graph::{render, GraphRequest, GraphStyle};

pub fn draw_changes(f: &mut Frame, area: Rect, engine: &ReplayEngine) {
    let title = match engine.graph_style() {
        GraphStyle::DotMatrix => "Commit Changes",
        GraphStyle::Bars => "Commit Changes (bars)",
    };
    let block = panel(title);
    let inner = block.inner(area);

    let request = GraphRequest {
        commits: engine.visible(),
        extremes: engine.extremes(),
        columns: engine.viewport().graph_columns.min(inner.width as usize),
        rows: inner.height as usize,
    };
    let lines = render(engine.graph_style(), &request);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
