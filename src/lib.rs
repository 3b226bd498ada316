pub mod analyzer;
pub mod config;
pub mod debounce;
pub mod highlight;
pub mod logging;
pub mod models;
pub mod render;
pub mod tui;
pub mod utils;
pub mod worker;

pub use analyzer::{AnalyzerClient, AnalyzerClientBuilder, AnalyzerClientTrait, AnalyzerError};
pub use config::{Config, ConfigOverrides};
pub use debounce::Debouncer;
pub use highlight::Highlight;
pub use models::{AnalysisResponse, AnalyzeRequest, ConfidenceTier, ResultWrapper, TextSpan};
pub use render::{Section, SectionBody, SectionToggle, render_plain, render_section};
pub use worker::{AnalysisOutcome, AnalysisWorker};
