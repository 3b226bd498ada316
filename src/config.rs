//! Runtime configuration assembled from CLI flags, environment and defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analyzer::DEFAULT_API_URL;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Values given on the command line. `None` falls through to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl Config {
    /// Resolves each setting from `overrides`, then `TEXTLENS_*` variables, then defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or no default log
    /// location can be determined.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let api_url = match overrides.api_url {
            Some(url) => url,
            None => std::env::var("TEXTLENS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
        };

        let debounce_ms = match overrides.debounce_ms {
            Some(ms) => ms,
            None => env_u64("TEXTLENS_DEBOUNCE_MS")?.unwrap_or(DEFAULT_DEBOUNCE_MS),
        };

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => env_u64("TEXTLENS_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let log_file = match overrides.log_file {
            Some(path) => path,
            None => match std::env::var_os("TEXTLENS_LOG") {
                Some(path) => PathBuf::from(path),
                None => crate::utils::default_log_path()?,
            },
        };

        Ok(Self {
            api_url,
            debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            log_file,
        })
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got {value:?}")),
        Err(_) => Ok(None),
    }
}
