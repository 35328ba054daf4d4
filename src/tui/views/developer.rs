use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{heading, panel};
use crate::replay::ReplayEngine;
use crate::stats::{aggregate, bar_length, DeveloperStats};
use crate::util::truncate_message;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const BAR: &str = "█";
const MIN_BAR_WIDTH: usize = 10;

fn histogram(title: &str, labels: &[String], counts: &[usize], width: usize) -> Vec<Line<'static>> {
    let max = counts.iter().copied().max().unwrap_or(0);
    let mut lines = vec![heading(title)];
    for (label, &count) in labels.iter().zip(counts) {
        lines.push(Line::from(vec![
            Span::raw(format!(" {label:<12} |")),
            Span::styled(
                BAR.repeat(bar_length(count, width, max)),
                Style::default().fg(Color::Indexed(63)),
            ),
            Span::raw(format!(" {count:<5}")),
        ]));
    }
    lines
}

/// Top contributors and activity histograms, with bars up to `width` cells.
pub fn developer_lines(stats: &DeveloperStats, width: usize) -> Vec<Line<'static>> {
    let bar_width = width.saturating_sub(20).max(MIN_BAR_WIDTH);
    let title = match stats.year {
        Some(year) => format!("Top 5 ({year})"),
        None => "Top 5 (All-Time)".to_string(),
    };

    let mut lines = vec![heading(title)];
    for author in &stats.top_authors {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<18} ", truncate_message(&author.name, 32)),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(author.churn.to_string()),
        ]));
    }
    lines.push(Line::from(""));

    let months: Vec<String> = MONTHS.iter().map(|m| m.to_string()).collect();
    lines.extend(histogram("Commits by Month", &months, &stats.months, bar_width));
    lines.push(Line::from(""));

    let weekdays: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
    lines.extend(histogram("Commits by Weekday", &weekdays, &stats.weekdays, bar_width));
    lines.push(Line::from(""));

    let hours: Vec<String> = (0..24).map(|h| format!("{h:02}:00-{h:02}:59")).collect();
    lines.extend(histogram("Commits by Hour (Local)", &hours, &stats.hours, bar_width));
    lines
}

pub fn draw_developer_stats(f: &mut Frame, area: Rect, engine: &ReplayEngine) {
    let block = panel("Developer Stats");
    let inner = block.inner(area);
    let stats = aggregate(engine.visible(), engine.year());
    let lines = developer_lines(&stats, inner.width as usize);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
