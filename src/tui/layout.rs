use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::ops::Range;

pub const STATS_PANEL_HEIGHT: u16 = 9;
pub const MIN_TIMELINE_HEIGHT: u16 = 8;

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Panel areas of the main screen: three stacked panels on the left,
/// developer statistics on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardAreas {
    pub stats: Rect,
    pub changes: Rect,
    pub timeline: Rect,
    pub developer: Rect,
}

pub fn dashboard_areas(area: Rect) -> DashboardAreas {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATS_PANEL_HEIGHT),
            Constraint::Percentage(55),
            Constraint::Min(MIN_TIMELINE_HEIGHT),
        ])
        .split(columns[0]);

    DashboardAreas {
        stats: left[0],
        changes: left[1],
        timeline: left[2],
        developer: columns[1],
    }
}

/// Rows of the timeline to show: `height` entries around `cursor`, shifted
/// so the panel stays full when the cursor is near either end.
pub fn timeline_window(cursor: usize, len: usize, height: usize) -> Range<usize> {
    if len == 0 || height == 0 {
        return 0..0;
    }
    let start = cursor
        .saturating_sub(height / 2)
        .min(len.saturating_sub(height));
    start..(start + height).min(len)
}
