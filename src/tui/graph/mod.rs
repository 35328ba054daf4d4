//! Additions/deletions change graph over the commits up to the cursor,
//! windowed to the most recent `columns` commits.

mod braille;

pub use braille::BrailleCanvas;

use crate::model::{CommitRecord, SeriesExtremes};
use crate::tui::draw::{
    addition_style, axis_style, cursor_style, deletion_style, gradient_step, ADDITION_GRADIENT,
    DELETION_GRADIENT,
};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub const PLACEHOLDER: &str = "Insufficient data";
pub const MIN_COLUMNS: usize = 11;
pub const MIN_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphStyle {
    #[default]
    DotMatrix,
    Bars,
}

impl GraphStyle {
    pub fn toggled(self) -> Self {
        match self {
            GraphStyle::DotMatrix => GraphStyle::Bars,
            GraphStyle::Bars => GraphStyle::DotMatrix,
        }
    }
}

/// Everything a graph needs: the visible commits `[0..=cursor]`, the
/// scale, and the character grid it may occupy.
#[derive(Debug, Clone, Copy)]
pub struct GraphRequest<'a> {
    pub commits: &'a [CommitRecord],
    pub extremes: SeriesExtremes,
    pub columns: usize,
    pub rows: usize,
}

impl<'a> GraphRequest<'a> {
    fn insufficient(&self) -> bool {
        self.commits.is_empty() || self.columns < MIN_COLUMNS
    }

    /// The trailing window of commits paired with their column.
    fn window(&self) -> impl Iterator<Item = (usize, &'a CommitRecord)> + 'a {
        let commits: &'a [CommitRecord] = self.commits;
        let len = commits.len();
        let start = len.saturating_sub(self.columns);
        let columns = self.columns;
        commits[start..]
            .iter()
            .enumerate()
            .map(move |(i, c)| (columns - (len - start - i), c))
    }
}

pub fn render(style: GraphStyle, request: &GraphRequest<'_>) -> Vec<Line<'static>> {
    match style {
        GraphStyle::DotMatrix => dot_matrix(request),
        GraphStyle::Bars => bars(request),
    }
}

/// Log-compressed length of `value` on a scale whose top is `max`, out of `span`.
pub fn scaled(value: usize, max: usize, span: usize) -> usize {
    if value == 0 {
        return 0;
    }
    let top = (max.max(1) as f64).ln_1p();
    let ratio = ((value as f64).ln_1p() / top).min(1.0);
    (ratio * span as f64) as usize
}

fn placeholder() -> Vec<Line<'static>> {
    vec![Line::from(PLACEHOLDER)]
}

/// Braille rendering: additions rise from the centre line, deletions fall below it.
pub fn dot_matrix(request: &GraphRequest<'_>) -> Vec<Line<'static>> {
    if request.insufficient() {
        return placeholder();
    }
    let rows = request.rows.max(MIN_ROWS);
    let half = rows / 2;
    let mut canvas = BrailleCanvas::new(request.columns * 2, rows * 4);
    // The axis sits on a cell boundary so no glyph mixes both bands; with
    // an odd row count the spare row goes below and stays empty.
    let zero_line = half * 4;
    let span = zero_line - 1;

    for (col, commit) in request.window() {
        let x = col * 2;
        let up = scaled(commit.additions, request.extremes.max_additions, span);
        let down = scaled(commit.deletions, request.extremes.max_deletions, span);
        for y in 0..up {
            canvas.set(x, zero_line - 1 - y);
        }
        for y in 0..down {
            canvas.set(x, zero_line + y);
        }
    }

    canvas
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row, text)| {
            let color = if row < half {
                ADDITION_GRADIENT[gradient_step(row, half)]
            } else {
                DELETION_GRADIENT[gradient_step(row - half, rows - half)]
            };
            Line::from(Span::styled(text, Style::default().fg(color)))
        })
        .collect()
}

/// Block rendering: one character column per commit around an axis row.
/// The column of the commit under the cursor is highlighted.
pub fn bars(request: &GraphRequest<'_>) -> Vec<Line<'static>> {
    if request.insufficient() {
        return placeholder();
    }
    let rows = request.rows.max(MIN_ROWS);
    let axis = rows / 2;
    // Same reach both ways; an even row count leaves the bottom row empty.
    let reach = axis.min(rows - axis - 1);

    let mut heights = vec![(0usize, 0usize); request.columns];
    for (col, commit) in request.window() {
        heights[col] = (
            scaled(commit.additions, request.extremes.max_additions, reach),
            scaled(commit.deletions, request.extremes.max_deletions, reach),
        );
    }
    let cursor_col = request.columns - 1;

    (0..rows)
        .map(|row| {
            let spans: Vec<Span<'static>> = heights
                .iter()
                .enumerate()
                .map(|(col, &(up, down))| {
                    let (symbol, style) = if row == axis {
                        ("─", axis_style())
                    } else if row < axis && axis - row <= up {
                        ("█", addition_style())
                    } else if row > axis && row - axis <= down {
                        ("█", deletion_style())
                    } else {
                        (" ", Style::default())
                    };
                    let style = if col == cursor_col && symbol != " " {
                        style.patch(cursor_style())
                    } else {
                        style
                    };
                    Span::styled(symbol, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
