mod analysis;
mod confidence;
mod span;

pub use analysis::{
    AnalysisResponse, AnalyzeRequest, DetectedLanguage, Entity, KeyPhrases, LinkedEntity,
    LinkedEntityMatch, PiiEntity, ResultWrapper, SentimentResult,
};
pub use confidence::ConfidenceTier;
pub use span::TextSpan;
