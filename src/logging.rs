use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Result;

pub const LOG_ENV_VAR: &str = "VISAGIT_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// The dashboard owns the terminal and no log file was requested.
    Discard,
}

pub fn setup_logger(target: LogTarget) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(if cfg!(debug_assertions) {
            LevelFilter::DEBUG.into()
        } else {
            LevelFilter::INFO.into()
        })
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(std::io::sink), false),
    };

    let fmt = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(writer);

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(env_filter)
        .try_init();
    Ok(())
}
