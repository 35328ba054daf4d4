//! Author activity over a commit range: top contributors and
//! month / weekday / hour histograms.

use crate::model::CommitRecord;
use chrono::{Datelike, Local, TimeZone, Timelike};
use std::collections::{HashMap, HashSet};

pub const TOP_AUTHORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorChurn {
    pub name: String,
    pub churn: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperStats {
    /// `None` means all time.
    pub year: Option<i32>,
    pub top_authors: Vec<AuthorChurn>,
    pub author_count: usize,
    /// Distinct years in the unfiltered range, newest first.
    pub years: Vec<i32>,
    pub months: [usize; 12],
    /// Monday first.
    pub weekdays: [usize; 7],
    pub hours: [usize; 24],
    pub analyzed: usize,
}

/// Aggregate `commits`, bucketing hours in the local time zone.
pub fn aggregate(commits: &[CommitRecord], year: Option<i32>) -> DeveloperStats {
    aggregate_in(commits, year, &Local)
}

/// Aggregate `commits` with hours bucketed in `tz`. Years, months and
/// weekdays use each commit's own recorded offset.
pub fn aggregate_in<Tz: TimeZone>(
    commits: &[CommitRecord],
    year: Option<i32>,
    tz: &Tz,
) -> DeveloperStats {
    let mut stats = DeveloperStats {
        year,
        top_authors: Vec::new(),
        author_count: 0,
        years: distinct_years(commits),
        months: [0; 12],
        weekdays: [0; 7],
        hours: [0; 24],
        analyzed: 0,
    };

    let mut authors: Vec<AuthorChurn> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for commit in commits {
        if year.is_some_and(|y| commit.timestamp.year() != y) {
            continue;
        }
        stats.analyzed += 1;

        let slot = *index.entry(commit.author.as_str()).or_insert_with(|| {
            authors.push(AuthorChurn {
                name: commit.author.clone(),
                churn: 0,
            });
            authors.len() - 1
        });
        authors[slot].churn += commit.churn;

        stats.months[commit.timestamp.month0() as usize] += 1;
        stats.weekdays[commit.timestamp.weekday().num_days_from_monday() as usize] += 1;
        stats.hours[commit.timestamp.with_timezone(tz).hour() as usize] += 1;
    }

    stats.author_count = authors.len();
    // Stable sort keeps first-seen order among equal churn.
    authors.sort_by(|a, b| b.churn.cmp(&a.churn));
    authors.truncate(TOP_AUTHORS);
    stats.top_authors = authors;
    stats
}

pub fn distinct_authors(commits: &[CommitRecord]) -> usize {
    commits
        .iter()
        .map(|c| c.author.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn distinct_years(commits: &[CommitRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = commits.iter().map(|c| c.timestamp.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// The year filter choices in display order: all time, then years newest first.
pub fn year_choices(commits: &[CommitRecord]) -> Vec<Option<i32>> {
    std::iter::once(None)
        .chain(distinct_years(commits).into_iter().map(Some))
        .collect()
}

/// Step through `choices` cyclically. A selection missing from `choices`
/// is treated as the first entry.
pub fn cycle_year(choices: &[Option<i32>], current: Option<i32>, forward: bool) -> Option<i32> {
    if choices.is_empty() {
        return None;
    }
    let len = choices.len();
    let pos = choices.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    choices[next]
}

/// Bar length for a histogram entry; an empty group scales against 1.
pub fn bar_length(count: usize, width: usize, max: usize) -> usize {
    count * width / max.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::at;
    use crate::model::{CommitMetadata, DiffStats};
    use chrono::{DateTime, FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn commit(author: &str, churn: usize, timestamp: DateTime<FixedOffset>) -> CommitRecord {
        let meta = CommitMetadata {
            id: format!("{author}-{timestamp}"),
            message: "work".to_string(),
            author_name: author.to_string(),
            timestamp,
            parent_ids: vec!["p".to_string()],
        };
        CommitRecord::new(
            meta,
            DiffStats {
                files: 1,
                additions: churn,
                deletions: 0,
            },
        )
    }

    fn history() -> Vec<CommitRecord> {
        vec![
            commit("alice", 10, at(2022, 1, 3, 9)),
            commit("bob", 30, at(2023, 6, 4, 14)),
            commit("carol", 10, at(2023, 6, 5, 23)),
            commit("alice", 25, at(2024, 12, 31, 0)),
            commit("dave", 1, at(2024, 2, 29, 9)),
            commit("erin", 2, at(2024, 2, 29, 10)),
            commit("frank", 3, at(2024, 3, 1, 11)),
        ]
    }

    #[test]
    fn top_authors_rank_by_churn_with_stable_ties() {
        let stats = aggregate_in(&history(), None, &Utc);
        let ranked: Vec<(&str, usize)> = stats
            .top_authors
            .iter()
            .map(|a| (a.name.as_str(), a.churn))
            .collect();
        assert_eq!(
            ranked,
            vec![("alice", 35), ("bob", 30), ("carol", 10), ("frank", 3), ("erin", 2)]
        );
        assert_eq!(stats.author_count, 6);
    }

    #[test]
    fn histograms_cover_exactly_the_analyzed_range() {
        for year in [None, Some(2023), Some(2024), Some(1999)] {
            let stats = aggregate_in(&history(), year, &Utc);
            assert_eq!(stats.months.iter().sum::<usize>(), stats.analyzed);
            assert_eq!(stats.weekdays.iter().sum::<usize>(), stats.analyzed);
            assert_eq!(stats.hours.iter().sum::<usize>(), stats.analyzed);
        }
        assert_eq!(aggregate_in(&history(), None, &Utc).analyzed, 7);
        assert_eq!(aggregate_in(&history(), Some(2023), &Utc).analyzed, 2);
        assert_eq!(aggregate_in(&history(), Some(1999), &Utc).analyzed, 0);
    }

    #[test]
    fn buckets_land_where_expected() {
        // 2022-01-03 was a Monday, 2023-06-04 a Sunday.
        let stats = aggregate_in(&history()[..2], None, &Utc);
        assert_eq!(stats.months[0], 1);
        assert_eq!(stats.months[5], 1);
        assert_eq!(stats.weekdays[0], 1);
        assert_eq!(stats.weekdays[6], 1);
        assert_eq!(stats.hours[9], 1);
        assert_eq!(stats.hours[14], 1);
    }

    #[test]
    fn year_filter_restricts_ranking() {
        let stats = aggregate_in(&history(), Some(2023), &Utc);
        let names: Vec<&str> = stats.top_authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);
        assert_eq!(stats.years, vec![2024, 2023, 2022]);
    }

    #[test]
    fn year_cycle_wraps_both_ways() {
        let choices = year_choices(&history());
        assert_eq!(choices, vec![None, Some(2024), Some(2023), Some(2022)]);

        let mut current = None;
        for _ in 0..choices.len() {
            current = cycle_year(&choices, current, true);
        }
        assert_eq!(current, None);

        assert_eq!(cycle_year(&choices, None, false), Some(2022));
        assert_eq!(cycle_year(&choices, Some(2022), true), None);
        assert_eq!(cycle_year(&choices, Some(1990), true), Some(2024));
    }

    #[test]
    fn year_cycle_with_no_commits_stays_all_time() {
        let choices = year_choices(&[]);
        assert_eq!(cycle_year(&choices, None, true), None);
        assert_eq!(cycle_year(&choices, None, false), None);
    }

    #[test]
    fn bar_length_guards_empty_group() {
        assert_eq!(bar_length(0, 20, 0), 0);
        assert_eq!(bar_length(5, 20, 10), 10);
        assert_eq!(bar_length(10, 20, 10), 20);
        assert_eq!(bar_length(3, 10, 7), 4);
    }
}
