// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    /// Level override read after `RUST_LOG`, e.g. `VANGUARD_RECON_LOGLEVEL=debug`.
    pub static ref LOG_LEVEL_ENV: String =
        format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase());
    pub static ref LOG_FILE_NAME: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Used when the platform has no home directory to derive a data dir from.
const FALLBACK_LOG_DIR: &str = ".vanguard-recon";

/// Where the log file lives: the per-user data dir of the recon agent.
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("org", "recon-agent", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG_DIR))
}

fn log_filter() -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_LEVEL_ENV.as_str()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));
    EnvFilter::new(directive)
}

/// Sends tracing output to a fresh log file and returns its path.
///
/// Stdout carries the progress markers and the report, so nothing is logged
/// to the terminal.
pub fn initialize_logging() -> Result<PathBuf> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE_NAME.as_str());
    let file = std::fs::File::create(&path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(log_filter());

    tracing_subscriber::registry().with(file_layer).with(ErrorLayer::default()).try_init()?;

    Ok(path)
}
