//! File-backed tracing setup.
//!
//! The TUI owns the terminal, so logs always go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "textlens=info,lens=info";

/// Installs a global subscriber appending to `path`.
///
/// `RUST_LOG` overrides the default filter.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a subscriber is already set.
pub fn init(path: &Path) -> Result<()> {
    crate::utils::ensure_parent_directory(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(())
}
