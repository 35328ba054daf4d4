use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel;
use crate::model::CommitRecord;
use crate::tui::draw::{addition_style, cursor_style, deletion_style, selected_row_style};
use crate::tui::layout::timeline_window;
use crate::util::{format_stat, truncate_message};

const HASH_WIDTH: usize = 8;
const STATS_WIDTH: usize = 15;
const MIN_MESSAGE_WIDTH: usize = 20;

/// One row per commit in a window centred on `cursor`.
pub fn timeline_lines(
    commits: &[CommitRecord],
    cursor: usize,
    width: usize,
    height: usize,
) -> Vec<Line<'static>> {
    if commits.is_empty() {
        return vec![Line::from("No commits")];
    }
    let message_width = width
        .saturating_sub(HASH_WIDTH + STATS_WIDTH + 2)
        .max(MIN_MESSAGE_WIDTH);

    timeline_window(cursor, commits.len(), height)
        .map(|i| {
            let commit = &commits[i];
            let selected = i == cursor;
            let message = truncate_message(&commit.message, message_width);
            let mut spans = vec![
                Span::styled(
                    commit.short_hash().to_string(),
                    Style::default().fg(Color::Indexed(111)),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<7}", format!("+{}", format_stat(commit.additions))),
                    addition_style(),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<7}", format!("-{}", format_stat(commit.deletions))),
                    deletion_style(),
                ),
                Span::raw(" "),
                if selected {
                    Span::styled(message, cursor_style())
                } else {
                    Span::styled(message, Style::default().fg(Color::Indexed(246)))
                },
            ];
            if selected {
                for span in &mut spans {
                    span.style = span.style.patch(selected_row_style());
                }
            }
            Line::from(spans)
        })
        .collect()
}

pub fn draw_timeline(f: &mut Frame, area: Rect, commits: &[CommitRecord], cursor: usize) {
    let block = panel("Commit Timeline");
    let inner = block.inner(area);
    let lines = timeline_lines(commits, cursor, inner.width as usize, inner.height as usize);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::record;
    use crate::model::CommitLog;
    use crate::tui::views::testing::plain;

    fn commits(n: usize) -> Vec<CommitRecord> {
        let mut log = CommitLog::new();
        for i in 0..n {
            log.integrate(record(&format!("{i:07x}abcdef"), &["p"], i * 700, 3));
        }
        log.into_records()
    }

    #[test]
    fn rows_show_hash_stats_and_message() {
        let commits = commits(3);
        let lines = timeline_lines(&commits, 2, 60, 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            plain(&lines[2]),
            format!("0000002 {:<7} {:<7} commit 0000002abcdef", "+1.4k", "-3")
        );
    }

    #[test]
    fn window_follows_cursor() {
        let commits = commits(30);
        let lines = timeline_lines(&commits, 15, 60, 6);
        assert_eq!(lines.len(), 6);
        assert!(plain(&lines[0]).starts_with("000000c"));
        assert_eq!(lines[3].spans[6].style, cursor_style().patch(selected_row_style()));
    }

    #[test]
    fn empty_history_has_placeholder() {
        assert_eq!(plain(&timeline_lines(&[], 0, 60, 6)[0]), "No commits");
    }
}
