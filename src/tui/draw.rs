use ratatui::style::{Color, Modifier, Style};

pub const GRADIENT_STEPS: usize = 10;

/// Addition band colours, lightest (far from the axis) to strongest (at the axis).
pub const ADDITION_GRADIENT: [Color; GRADIENT_STEPS] = [
    Color::Rgb(0xE6, 0xFF, 0xE6),
    Color::Rgb(0xCC, 0xFF, 0xCC),
    Color::Rgb(0xB3, 0xFF, 0xB3),
    Color::Rgb(0x99, 0xFF, 0x99),
    Color::Rgb(0x80, 0xFF, 0x80),
    Color::Rgb(0x66, 0xFF, 0x66),
    Color::Rgb(0x4D, 0xFF, 0x4D),
    Color::Rgb(0x33, 0xFF, 0x33),
    Color::Rgb(0x1A, 0xFF, 0x1A),
    Color::Rgb(0x00, 0xFF, 0x00),
];

/// Deletion band colours, strongest (at the axis) to lightest (far from the axis).
pub const DELETION_GRADIENT: [Color; GRADIENT_STEPS] = [
    Color::Rgb(0xFF, 0x00, 0x00),
    Color::Rgb(0xFF, 0x1A, 0x1A),
    Color::Rgb(0xFF, 0x33, 0x33),
    Color::Rgb(0xFF, 0x4D, 0x4D),
    Color::Rgb(0xFF, 0x66, 0x66),
    Color::Rgb(0xFF, 0x80, 0x80),
    Color::Rgb(0xFF, 0x99, 0x99),
    Color::Rgb(0xFF, 0xB3, 0xB3),
    Color::Rgb(0xFF, 0xCC, 0xCC),
    Color::Rgb(0xFF, 0xE6, 0xE6),
];

/// Gradient step for position `offset` within a band of `span` rows.
pub fn gradient_step(offset: usize, span: usize) -> usize {
    if span == 0 {
        return GRADIENT_STEPS - 1;
    }
    (offset * GRADIENT_STEPS / span).min(GRADIENT_STEPS - 1)
}

pub fn addition_style() -> Style {
    Style::default().fg(Color::Indexed(118))
}

pub fn deletion_style() -> Style {
    Style::default().fg(Color::Indexed(203))
}

pub fn axis_style() -> Style {
    Style::default().fg(Color::Indexed(238))
}

pub fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Indexed(255))
        .add_modifier(Modifier::BOLD)
}

pub fn label_style() -> Style {
    Style::default().fg(Color::Indexed(147)).add_modifier(Modifier::BOLD)
}

pub fn selected_row_style() -> Style {
    Style::default()
        .bg(Color::Indexed(236))
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border_style() -> Style {
    Style::default().fg(Color::Indexed(239))
}
