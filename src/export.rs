use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepo;
use crate::ingest;
use crate::model::{CommitRecord, ExportEntry, ExportOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Ndjson,
    Summary,
}

pub fn exec(config: &Config, format: ExportFormat) -> anyhow::Result<()> {
    let records = collect(config).context("Failed to read repository history")?;
    let entries: Vec<ExportEntry> = records.iter().map(ExportEntry::from).collect();

    match format {
        ExportFormat::Json => {
            let repository_path = std::fs::canonicalize(&config.repo_path)
                .unwrap_or_else(|_| config.repo_path.clone())
                .to_string_lossy()
                .to_string();
            println!("{}", render_json(&entries, repository_path, Utc::now())?);
        }
        ExportFormat::Ndjson => print!("{}", render_ndjson(&entries)?),
        ExportFormat::Summary => output_summary(&entries),
    }
    Ok(())
}

/// Stream the whole history through the ingestor and wait for it to finish.
fn collect(config: &Config) -> Result<Vec<CommitRecord>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Reading commit history...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let path = config.repo_path.clone();
    let feed = ingest::spawn(move || GitRepo::open(path), config.commit_limit)?;
    let records = ingest::drain(feed);
    pb.finish_and_clear();
    records
}

pub fn render_json(
    entries: &[ExportEntry],
    repository_path: String,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let output = ExportOutput {
        version: SCHEMA_VERSION,
        generated_at,
        repository_path,
        entries: entries.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn render_ndjson(entries: &[ExportEntry]) -> Result<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    Ok(out)
}

fn output_summary(entries: &[ExportEntry]) {
    use console::style;

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let total_files: usize = entries.iter().map(|e| e.files).sum();
    let total_added: usize = entries.iter().map(|e| e.additions).sum();
    let total_deleted: usize = entries.iter().map(|e| e.deletions).sum();
    let unique_authors: HashSet<_> = entries.iter().map(|e| &e.author).collect();

    println!("Total commits: {}", style(entries.len()).cyan());
    println!("Total files changed: {}", style(total_files).cyan());
    println!("Total lines added: {}", style(total_added).green());
    println!("Total lines deleted: {}", style(total_deleted).red());
    println!("Unique authors: {}", style(unique_authors.len()).yellow());

    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        println!(
            "Date range: {} to {}",
            style(first.date.format("%Y-%m-%d")).dim(),
            style(last.date.format("%Y-%m-%d")).dim()
        );
    }

    println!("\nUse --json or --ndjson to export the raw data.");
}
