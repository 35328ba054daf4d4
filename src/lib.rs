pub mod cli;
pub mod config;
pub mod diff_view;
pub mod error;
pub mod export;
pub mod git;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod preload;
pub mod queue;
pub mod replay;
pub mod snapshot;
pub mod stats;
pub mod tui;
pub mod util;
