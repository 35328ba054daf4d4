use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;

use crate::config::{Config, Overrides};
use crate::export::ExportFormat;
use crate::logging::{setup_logger, LogTarget};
use crate::tui::Dashboard;

#[derive(Parser)]
#[command(name = "visagit")]
#[command(about = "Replay a git repository's history as a live terminal dashboard")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(help = "Path to git repository (overrides --repo)")]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, allow_negative_numbers = true, help = "Maximum number of commits to load (0 or less: unlimited)")]
    pub limit: Option<i64>,

    #[arg(long, global = true, value_name = "BOOL", help = "Advance through commits automatically [default: true]")]
    pub auto: Option<bool>,

    #[arg(long, global = true, value_name = "MS", help = "Milliseconds between replay ticks [default: 50]")]
    pub interval: Option<u64>,

    #[arg(long, global = true, help = "Config file (default: ./.visagit.toml when present)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Write logs to this file")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Replay history in the terminal dashboard (default)
    Replay {
        #[arg(long, help = "Load every commit up front on a worker pool")]
        preload: bool,

        #[arg(long, help = "Pre-load worker threads (0: 75% of CPUs)")]
        workers: Option<usize>,

        #[arg(long, help = "Exit after the pre-load report")]
        preload_exit: bool,

        #[arg(long, value_name = "PCT", value_parser = clap::value_parser!(u8).range(0..=100), help = "Pre-load only this percent of the history (0: all)")]
        sample: Option<u8>,

        #[arg(long, help = "Reuse pre-loaded records from this file and save them back")]
        report_file: Option<PathBuf>,
    },
    /// Print every commit with its statistics
    Export {
        #[arg(long, help = "Output as JSON (default)")]
        json: bool,

        #[arg(long, help = "Output as NDJSON", conflicts_with = "json")]
        ndjson: bool,

        #[arg(long, help = "Print a short summary instead of raw data", conflicts_with_all = ["json", "ndjson"])]
        summary: bool,
    },
}

impl CommonArgs {
    fn overrides(&self, positional: Option<PathBuf>) -> Overrides {
        Overrides {
            repo_path: positional.or_else(|| self.repo.clone()),
            commit_limit: self.limit,
            auto_progress: self.auto,
            tick_interval_ms: self.interval,
            ..Overrides::default()
        }
    }
}

impl Cli {
    /// Resolve the layered configuration for this invocation.
    pub fn config(&self) -> Result<Config> {
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        let mut config = Config::load(&cwd, self.common.config.as_deref())
            .context("Failed to load configuration")?;
        config.apply(self.common.overrides(self.path.clone()));

        if let Some(Commands::Replay {
            preload,
            workers,
            preload_exit,
            sample,
            report_file,
        }) = &self.command
        {
            config.apply(Overrides {
                preload: preload.then_some(true),
                workers: *workers,
                preload_exit: preload_exit.then_some(true),
                sample_pct: *sample,
                report_file: report_file.clone(),
                ..Overrides::default()
            });
        }
        config.validate()?;
        Ok(config)
    }

    pub fn execute(self) -> Result<()> {
        let config = self.config()?;
        match self.command.clone() {
            Some(Commands::Export { ndjson, summary, .. }) => {
                setup_logger(LogTarget::Stderr)?;
                let format = if summary {
                    ExportFormat::Summary
                } else if ndjson {
                    ExportFormat::Ndjson
                } else {
                    ExportFormat::Json
                };
                crate::export::exec(&config, format)
            }
            Some(Commands::Replay { .. }) | None => self.replay(config),
        }
    }

    fn replay(&self, config: Config) -> Result<()> {
        if config.preload {
            setup_logger(self.log_target(config.preload_exit))?;
            let (log, report) = crate::preload::preload(&config, true)
                .context("Failed to pre-load repository history")?;
            println!("{}", style(report.summary()).green());
            if config.preload_exit {
                return Ok(());
            }
            return crate::tui::run(Dashboard::preloaded(&config, log))
                .context("Terminal session failed");
        }

        setup_logger(self.log_target(false))?;
        let dashboard = Dashboard::open(&config).context("Failed to start ingestion")?;
        crate::tui::run(dashboard).context("Failed to replay repository history")
    }

    fn log_target(&self, headless: bool) -> LogTarget {
        match &self.common.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None if headless => LogTarget::Stderr,
            None => LogTarget::Discard,
        }
    }
}
