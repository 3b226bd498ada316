/// HTTP client for the text analysis service.
///
/// Wraps the service's `/analyze`, `/` and `/settings` endpoints with a blocking
/// reqwest client, a builder for configuration and a trait seam for mocking.
mod client;

pub use client::{
    AnalyzerClient, AnalyzerClientBuilder, AnalyzerClientTrait, AnalyzerError, DEFAULT_API_URL,
    ServiceInfo, ServiceSettings,
};
