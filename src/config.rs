//! Session configuration.
//!
//! Values are layered: built-in defaults, then `.visagit.toml` (or the file
//! named with `--config`), then command-line flags.
//!
//! ```toml
//! # .visagit.toml
//! repo_path = "../project"
//! commit_limit = 500
//! auto_progress = true
//! tick_interval_ms = 30
//! preload = true
//! sample_pct = 10
//! report_file = "visagit-report.json"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, VisagitError};

pub const DEFAULT_CONFIG_FILE: &str = ".visagit.toml";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo_path: PathBuf,
    /// `None` replays the whole history.
    pub commit_limit: Option<usize>,
    pub auto_progress: bool,
    pub tick_interval_ms: u64,
    pub preload: bool,
    /// Pre-load worker threads; 0 picks a count from the CPU total.
    pub workers: usize,
    pub preload_exit: bool,
    /// Percent of the history to pre-load, spread evenly; 0 loads everything.
    pub sample_pct: u8,
    /// Pre-loaded records are reused from and saved back to this file.
    pub report_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            commit_limit: None,
            auto_progress: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            preload: false,
            workers: 0,
            preload_exit: false,
            sample_pct: 0,
            report_file: None,
        }
    }
}

/// A partial configuration: every field is optional so layers can be merged.
/// Used both for the config file and for command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub repo_path: Option<PathBuf>,
    /// Zero or negative means unlimited.
    pub commit_limit: Option<i64>,
    pub auto_progress: Option<bool>,
    pub tick_interval_ms: Option<u64>,
    pub preload: Option<bool>,
    pub workers: Option<usize>,
    pub preload_exit: Option<bool>,
    pub sample_pct: Option<u8>,
    pub report_file: Option<PathBuf>,
}

impl Overrides {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            VisagitError::Config(format!("cannot read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }
}

fn limit_from(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|&n| n > 0)
}

impl Config {
    /// Defaults overlaid with the config file. An explicit `file` must exist;
    /// the default file in `dir` is optional.
    pub fn load(dir: &Path, file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        let layer = match file {
            Some(path) => Some(Overrides::from_toml_file(path)?),
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Some(Overrides::from_toml_file(&path)?)
                } else {
                    None
                }
            }
        };
        if let Some(layer) = layer {
            debug!(?layer, "config file loaded");
            config.apply(layer);
        }
        Ok(config)
    }

    pub fn apply(&mut self, layer: Overrides) {
        if let Some(path) = layer.repo_path {
            self.repo_path = path;
        }
        if let Some(limit) = layer.commit_limit {
            self.commit_limit = limit_from(limit);
        }
        if let Some(auto) = layer.auto_progress {
            self.auto_progress = auto;
        }
        if let Some(ms) = layer.tick_interval_ms {
            self.tick_interval_ms = ms;
        }
        if let Some(preload) = layer.preload {
            self.preload = preload;
        }
        if let Some(workers) = layer.workers {
            self.workers = workers;
        }
        if let Some(exit) = layer.preload_exit {
            self.preload_exit = exit;
        }
        if let Some(pct) = layer.sample_pct {
            self.sample_pct = pct;
        }
        if let Some(path) = layer.report_file {
            self.report_file = Some(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(VisagitError::Config(
                "tick interval must be at least 1ms".to_string(),
            ));
        }
        if self.sample_pct > 100 {
            return Err(VisagitError::Config(format!(
                "sample percent must be between 0 and 100, got {}",
                self.sample_pct
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.repo_path, PathBuf::from("."));
        assert_eq!(config.commit_limit, None);
        assert!(config.auto_progress);
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_default_file_is_fine() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load(dir.path(), None).unwrap(), Config::default());
    }

    #[test]
    fn default_file_is_picked_up() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "commit_limit = 25\nauto_progress = false\ntick_interval_ms = 10\n",
        )
        .unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.commit_limit, Some(25));
        assert!(!config.auto_progress);
        assert_eq!(config.tick_interval_ms, 10);
    }

    #[test]
    fn flags_override_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        fs::write(&file, "repo_path = \"/from/file\"\ncommit_limit = 25\n").unwrap();

        let mut config = Config::load(dir.path(), Some(&file)).unwrap();
        config.apply(Overrides {
            commit_limit: Some(3),
            repo_path: Some(PathBuf::from("/from/flag")),
            ..Overrides::default()
        });
        assert_eq!(config.commit_limit, Some(3));
        assert_eq!(config.repo_path, PathBuf::from("/from/flag"));
    }

    #[test]
    fn non_positive_limit_means_unlimited() {
        let mut config = Config::default();
        config.apply(Overrides {
            commit_limit: Some(10),
            ..Overrides::default()
        });
        assert_eq!(config.commit_limit, Some(10));
        for limit in [0, -1] {
            config.apply(Overrides {
                commit_limit: Some(limit),
                ..Overrides::default()
            });
            assert_eq!(config.commit_limit, None);
        }
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(dir.path(), Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, VisagitError::Config(_)));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            Overrides::from_toml_str("commit_limit = \"many\""),
            Err(VisagitError::Toml(_))
        ));
        assert!(Overrides::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn report_options_come_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "preload = true\nsample_pct = 25\nreport_file = \"report.json\"\n",
        )
        .unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert!(config.preload);
        assert_eq!(config.sample_pct, 25);
        assert_eq!(config.report_file, Some(PathBuf::from("report.json")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sample_above_hundred_is_rejected() {
        let config = Config {
            sample_pct: 101,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = Config {
            tick_interval_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
