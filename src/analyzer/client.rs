/// Analysis service HTTP client implementation.
///
/// This module provides `AnalyzerClient` for making synchronous requests to the
/// analysis service, along with its error type and builder.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{AnalysisResponse, AnalyzeRequest};

/// Base URL used when neither the builder nor `TEXTLENS_API_URL` provide one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when talking to the analysis service.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("Server error: status {status}")]
    Http { status: u16 },

    /// Response body was not the expected JSON
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Text was empty or whitespace only
    #[error("Text to analyze cannot be empty")]
    EmptyInput,
}

impl AnalyzerError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub version: String,
    pub description: String,
}

/// Response of `GET /settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub environment: String,
}

/// Builder for constructing `AnalyzerClient` instances.
///
/// # Examples
///
/// ```
/// use textlens::analyzer::AnalyzerClientBuilder;
///
/// let client = AnalyzerClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Default)]
pub struct AnalyzerClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl AnalyzerClientBuilder {
    /// Creates a new `AnalyzerClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the service (e.g., "http://localhost:8000").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `AnalyzerClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method will check the `TEXTLENS_API_URL`
    /// environment variable. If not set, it defaults to `http://localhost:8000`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzerError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<AnalyzerClient, AnalyzerError> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("TEXTLENS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| AnalyzerError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(AnalyzerError::Network)?;

        Ok(AnalyzerClient { client, base_url })
    }
}

/// Synchronous HTTP client for the analysis service.
///
/// Construct with `AnalyzerClientBuilder`.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

/// Trait for analysis operations.
///
/// Lets the background worker and tests run against mock implementations.
pub trait AnalyzerClientTrait: Send + Sync {
    /// Analyzes `text` and returns the service's response.
    fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalyzerError>;
}

impl AnalyzerClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the service's version and description from `GET /`.
    pub fn service_info(&self) -> Result<ServiceInfo, AnalyzerError> {
        self.get_json(&format!("{}/", self.base_url))
    }

    /// Fetches the service's runtime settings from `GET /settings`.
    pub fn service_settings(&self) -> Result<ServiceSettings, AnalyzerError> {
        self.get_json(&format!("{}/settings", self.base_url))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AnalyzerError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(AnalyzerError::from_reqwest)?;
        decode(response)
    }

    fn analyze_internal(&self, text: &str) -> Result<AnalysisResponse, AnalyzerError> {
        if text.trim().is_empty() {
            return Err(AnalyzerError::EmptyInput);
        }

        let url = format!("{}/analyze", self.base_url);
        debug!(url = %url, chars = text.chars().count(), "sending analysis request");

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest::new(text))
            .send()
            .map_err(AnalyzerError::from_reqwest)?;

        decode(response)
    }
}

impl AnalyzerClientTrait for AnalyzerClient {
    fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalyzerError> {
        self.analyze_internal(text)
    }
}

/// Checks the status and decodes a JSON body.
fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, AnalyzerError> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "analysis service returned an error status");
        return Err(AnalyzerError::Http {
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(AnalyzerError::from_reqwest)?;
    serde_json::from_str(&body).map_err(AnalyzerError::Serialization)
}
