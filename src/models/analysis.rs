//! Request and response bodies of the `/analyze` endpoint.

use serde::{Deserialize, Deserializer, Serialize};

use super::TextSpan;

/// Request body sent to `/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub statement: String,
}

impl AnalyzeRequest {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
        }
    }
}

/// Per-category envelope. A category can fail on its own while the rest succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultWrapper<T> {
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "none")]
    pub result: Option<T>,
}

// `#[serde(default)]` would add a `T: Default` bound to the derived impl.
fn none<T>() -> Option<T> {
    None
}

impl<T> ResultWrapper<T> {
    pub fn ok(result: T) -> Self {
        Self {
            has_error: false,
            error: None,
            result: Some(result),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            has_error: true,
            error: Some(error.into()),
            result: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub name: String,
    pub iso6391_name: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntity {
    pub category: String,
    pub confidence_score: f64,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub offset: usize,
    pub length: usize,
}

impl PiiEntity {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyPhrases {
    #[serde(default)]
    pub key_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub category: String,
    pub confidence_score: f64,
    pub offset: usize,
    pub length: usize,
}

impl Entity {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntityMatch {
    pub text: String,
    pub offset: usize,
    pub length: usize,
    pub confidence_score: f64,
}

impl LinkedEntityMatch {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.length)
    }
}

/// An entity resolved against a knowledge base.
///
/// Servers in the wild emit two shapes: one with `language`, `url` and
/// `data_source` plus a single match object, the other with category, score,
/// span and a list of matches. Both deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub data_source_entity_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub matches: Vec<LinkedEntityMatch>,
}

impl LinkedEntity {
    /// The entity's own span, falling back to its first match.
    pub fn span(&self) -> Option<TextSpan> {
        match (self.offset, self.length) {
            (Some(offset), Some(length)) => Some(TextSpan::new(offset, length)),
            _ => self.matches.first().map(LinkedEntityMatch::span),
        }
    }

    /// The entity's score, falling back to the best match score.
    pub fn score(&self) -> Option<f64> {
        self.confidence_score.or_else(|| {
            self.matches
                .iter()
                .map(|m| m.confidence_score)
                .reduce(f64::max)
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

/// Full response of one `/analyze` call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub redacted_text: Option<String>,
    #[serde(default)]
    pub lang: Option<ResultWrapper<DetectedLanguage>>,
    #[serde(default)]
    pub sentiment: Option<ResultWrapper<SentimentResult>>,
    #[serde(default)]
    pub pii: Option<ResultWrapper<Vec<PiiEntity>>>,
    #[serde(default)]
    pub key_phrases: Option<ResultWrapper<KeyPhrases>>,
    #[serde(default)]
    pub entities: Option<ResultWrapper<Vec<Entity>>>,
    #[serde(default)]
    pub linked_entities: Option<ResultWrapper<Vec<LinkedEntity>>>,
}

impl AnalysisResponse {
    /// A response standing in for a failed request.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            has_error: true,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
