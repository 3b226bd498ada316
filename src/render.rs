//! Maps an [`AnalysisResponse`] into display-ready section bodies.
//!
//! Nothing here touches the terminal; the TUI and the plain-text CLI output both
//! draw from the same [`SectionBody`] values.

use std::fmt;

use crate::highlight::Highlight;
use crate::models::{AnalysisResponse, ConfidenceTier, ResultWrapper, TextSpan};

/// Result categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Language,
    Sentiment,
    Pii,
    KeyPhrases,
    Entities,
    LinkedEntities,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Language,
        Section::Sentiment,
        Section::Pii,
        Section::KeyPhrases,
        Section::Entities,
        Section::LinkedEntities,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Language => "Language Detection",
            Self::Sentiment => "Sentiment Analysis",
            Self::Pii => "PII Entities",
            Self::KeyPhrases => "Key Phrases",
            Self::Entities => "Entities",
            Self::LinkedEntities => "Linked Entities",
        }
    }

    /// Field name of the category in the response body.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Language => "lang",
            Self::Sentiment => "sentiment",
            Self::Pii => "pii",
            Self::KeyPhrases => "key_phrases",
            Self::Entities => "entities",
            Self::LinkedEntities => "linked_entities",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labelled scalar value, e.g. `Confidence: 0.99`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub tier: Option<ConfidenceTier>,
}

impl Field {
    fn plain(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            tier: None,
        }
    }

    fn score(score: f64) -> Self {
        Self {
            label: "Confidence",
            value: format_score(score),
            tier: Some(ConfidenceTier::from_score(score)),
        }
    }
}

/// One list entry of a section, optionally tied to a span of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub text: String,
    pub details: Vec<String>,
    pub tier: Option<ConfidenceTier>,
    pub span: Option<TextSpan>,
}

/// What a section shows when expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    /// The response has no entry for this category
    NoData,
    /// The category failed on the service side
    Error(String),
    /// The category succeeded but found nothing
    NoResult,
    Fields(Vec<Field>),
    Items(Vec<Item>),
}

impl SectionBody {
    /// Items of the section, empty for non-list bodies.
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }
}

/// Formats a confidence score with two decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Builds the body of `section` from `response`.
pub fn render_section(response: &AnalysisResponse, section: Section) -> SectionBody {
    match section {
        Section::Language => unwrap_category(response.lang.as_ref(), |lang| {
            SectionBody::Fields(vec![
                Field::plain("Name", &lang.name),
                Field::plain("ISO6391", &lang.iso6391_name),
                Field::score(lang.confidence_score),
            ])
        }),
        Section::Sentiment => unwrap_category(response.sentiment.as_ref(), |sentiment| {
            SectionBody::Fields(vec![
                Field::plain("Sentiment", &sentiment.sentiment),
                Field::score(sentiment.confidence_score),
            ])
        }),
        Section::Pii => unwrap_category(response.pii.as_ref(), |entities| {
            items_or_empty(
                entities
                    .iter()
                    .map(|entity| {
                        let text = match &entity.subcategory {
                            Some(sub) => format!("{} / {}", entity.category, sub),
                            None => entity.category.clone(),
                        };
                        Item {
                            text,
                            details: vec![span_detail(entity.confidence_score, entity.span())],
                            tier: Some(ConfidenceTier::from_score(entity.confidence_score)),
                            span: Some(entity.span()),
                        }
                    })
                    .collect(),
            )
        }),
        Section::KeyPhrases => unwrap_category(response.key_phrases.as_ref(), |phrases| {
            items_or_empty(
                phrases
                    .key_phrases
                    .iter()
                    .map(|phrase| Item {
                        text: phrase.clone(),
                        details: Vec::new(),
                        tier: None,
                        span: None,
                    })
                    .collect(),
            )
        }),
        Section::Entities => unwrap_category(response.entities.as_ref(), |entities| {
            items_or_empty(
                entities
                    .iter()
                    .map(|entity| Item {
                        text: entity.category.clone(),
                        details: vec![span_detail(entity.confidence_score, entity.span())],
                        tier: Some(ConfidenceTier::from_score(entity.confidence_score)),
                        span: Some(entity.span()),
                    })
                    .collect(),
            )
        }),
        Section::LinkedEntities => unwrap_category(response.linked_entities.as_ref(), |entities| {
            items_or_empty(
                entities
                    .iter()
                    .map(|entity| {
                        let text = match &entity.language {
                            Some(language) => format!("{} ({})", entity.name, language),
                            None => entity.name.clone(),
                        };
                        let mut details = Vec::new();
                        if let Some(url) = &entity.url {
                            details.push(url.clone());
                        }
                        if let Some(source) = &entity.data_source {
                            details.push(format!("Data Source: {source}"));
                        }
                        if let Some(id) = &entity.data_source_entity_id {
                            details.push(format!("Entity ID: {id}"));
                        }
                        if let Some(category) = &entity.category {
                            details.push(format!("Category: {category}"));
                        }
                        if !entity.matches.is_empty() {
                            let matches: Vec<&str> =
                                entity.matches.iter().map(|m| m.text.as_str()).collect();
                            details.push(format!("Matches: {}", matches.join(", ")));
                        }
                        let score = entity.score();
                        Item {
                            text,
                            details,
                            tier: score.map(ConfidenceTier::from_score),
                            span: entity.span(),
                        }
                    })
                    .collect(),
            )
        }),
    }
}

fn unwrap_category<T>(
    wrapper: Option<&ResultWrapper<T>>,
    render: impl FnOnce(&T) -> SectionBody,
) -> SectionBody {
    let Some(wrapper) = wrapper else {
        return SectionBody::NoData;
    };
    if wrapper.has_error {
        return SectionBody::Error(
            wrapper
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        );
    }
    match &wrapper.result {
        Some(result) => render(result),
        None => SectionBody::NoResult,
    }
}

fn items_or_empty(items: Vec<Item>) -> SectionBody {
    if items.is_empty() {
        SectionBody::NoResult
    } else {
        SectionBody::Items(items)
    }
}

fn span_detail(score: f64, span: TextSpan) -> String {
    format!(
        "score: {}, offset: {}, length: {}",
        format_score(score),
        span.offset,
        span.length
    )
}

/// Accordion state: at most one section is expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionToggle {
    open: Option<Section>,
}

impl SectionToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `section`, or closes it if it is already open.
    pub fn toggle(&mut self, section: Section) {
        self.open = if self.open == Some(section) {
            None
        } else {
            Some(section)
        };
    }

    pub fn is_open(&self, section: Section) -> bool {
        self.open == Some(section)
    }

    pub fn open_section(&self) -> Option<Section> {
        self.open
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

/// Renders the whole response as plain text with every section expanded.
///
/// A top-level error is printed first; categories the service still filled
/// in are rendered after it.
pub fn render_plain(response: &AnalysisResponse) -> Vec<String> {
    let mut lines = Vec::new();

    if response.has_error {
        lines.push(format!(
            "Error: {}",
            response.error.as_deref().unwrap_or("Unknown error")
        ));
        lines.push(String::new());
    }

    if let Some(redacted) = &response.redacted_text {
        lines.push(format!("Redacted: {redacted}"));
        lines.push(String::new());
    }

    let text = response.input_text.as_deref();
    for section in Section::ALL {
        lines.push(format!("== {} ==", section.label()));
        match render_section(response, section) {
            SectionBody::NoData => lines.push("  No data".to_string()),
            SectionBody::NoResult => lines.push("  No result".to_string()),
            SectionBody::Error(message) => lines.push(format!("  Error: {message}")),
            SectionBody::Fields(fields) => {
                for field in fields {
                    match field.tier {
                        Some(tier) => {
                            lines.push(format!("  {}: {} [{}]", field.label, field.value, tier))
                        }
                        None => lines.push(format!("  {}: {}", field.label, field.value)),
                    }
                }
            }
            SectionBody::Items(items) => {
                for item in items {
                    let mut line = format!("  - {}", item.text);
                    if let (Some(text), Some(span)) = (text, item.span) {
                        let highlight = Highlight::split(text, span);
                        if !highlight.is_empty() {
                            line.push_str(&format!(" \"{}\"", highlight.highlight));
                        }
                    }
                    if let Some(tier) = item.tier {
                        line.push_str(&format!(" [{tier}]"));
                    }
                    lines.push(line);
                    for detail in item.details {
                        lines.push(format!("      {detail}"));
                    }
                }
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DetectedLanguage, Entity, KeyPhrases, LinkedEntity, LinkedEntityMatch, PiiEntity,
        SentimentResult,
    };

    fn sample_response() -> AnalysisResponse {
        AnalysisResponse {
            has_error: false,
            input_text: Some("Email Ana at ana@example.com about Lisbon".to_string()),
            error: None,
            redacted_text: Some("Email Ana at **************** about Lisbon".to_string()),
            lang: Some(ResultWrapper::ok(DetectedLanguage {
                name: "English".to_string(),
                iso6391_name: "en".to_string(),
                confidence_score: 0.99,
            })),
            sentiment: Some(ResultWrapper::failed("quota exceeded")),
            pii: Some(ResultWrapper::ok(vec![PiiEntity {
                category: "Email".to_string(),
                confidence_score: 0.8,
                subcategory: None,
                offset: 13,
                length: 15,
            }])),
            key_phrases: Some(ResultWrapper::ok(KeyPhrases::default())),
            entities: Some(ResultWrapper::ok(vec![Entity {
                category: "Location".to_string(),
                confidence_score: 0.55,
                offset: 35,
                length: 6,
            }])),
            linked_entities: None,
        }
    }

    #[test]
    fn sections_are_in_fixed_order_with_keys() {
        let keys: Vec<&str> = Section::ALL.iter().map(Section::key).collect();
        assert_eq!(
            keys,
            vec!["lang", "sentiment", "pii", "key_phrases", "entities", "linked_entities"]
        );
        assert_eq!(Section::LinkedEntities.index(), 5);
        assert_eq!(Section::Pii.label(), "PII Entities");
    }

    #[test]
    fn missing_category_renders_no_data() {
        let body = render_section(&sample_response(), Section::LinkedEntities);
        assert_eq!(body, SectionBody::NoData);
    }

    #[test]
    fn failed_category_renders_its_error() {
        let body = render_section(&sample_response(), Section::Sentiment);
        assert_eq!(body, SectionBody::Error("quota exceeded".to_string()));
    }

    #[test]
    fn failed_category_without_message_is_unknown_error() {
        let mut response = sample_response();
        response.sentiment = Some(ResultWrapper {
            has_error: true,
            error: None,
            result: None,
        });
        let body = render_section(&response, Section::Sentiment);
        assert_eq!(body, SectionBody::Error("Unknown error".to_string()));
    }

    #[test]
    fn empty_list_renders_no_result() {
        let body = render_section(&sample_response(), Section::KeyPhrases);
        assert_eq!(body, SectionBody::NoResult);
    }

    #[test]
    fn wrapper_without_result_renders_no_result() {
        let mut response = sample_response();
        response.lang = Some(ResultWrapper {
            has_error: false,
            error: None,
            result: None,
        });
        assert_eq!(
            render_section(&response, Section::Language),
            SectionBody::NoResult
        );
    }

    #[test]
    fn language_renders_fields_with_tier() {
        let SectionBody::Fields(fields) = render_section(&sample_response(), Section::Language)
        else {
            panic!("expected fields");
        };
        assert_eq!(fields[0].value, "English");
        assert_eq!(fields[1].value, "en");
        assert_eq!(fields[2].value, "0.99");
        assert_eq!(fields[2].tier, Some(ConfidenceTier::High));
    }

    #[test]
    fn entity_items_carry_span_and_tier() {
        let body = render_section(&sample_response(), Section::Entities);
        let items = body.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Location");
        assert_eq!(items[0].span, Some(TextSpan::new(35, 6)));
        assert_eq!(items[0].tier, Some(ConfidenceTier::Low));
        assert_eq!(items[0].details[0], "score: 0.55, offset: 35, length: 6");
    }

    #[test]
    fn pii_score_on_boundary_is_medium() {
        let body = render_section(&sample_response(), Section::Pii);
        assert_eq!(body.items()[0].tier, Some(ConfidenceTier::Medium));
    }

    #[test]
    fn linked_entities_use_match_span_and_list_details() {
        let mut response = sample_response();
        response.linked_entities = Some(ResultWrapper::ok(vec![LinkedEntity {
            name: "Lisbon".to_string(),
            language: Some("en".to_string()),
            url: Some("https://en.wikipedia.org/wiki/Lisbon".to_string()),
            data_source: Some("Wikipedia".to_string()),
            data_source_entity_id: Some("Lisbon".to_string()),
            category: None,
            confidence_score: None,
            offset: None,
            length: None,
            matches: vec![LinkedEntityMatch {
                text: "Lisbon".to_string(),
                offset: 35,
                length: 6,
                confidence_score: 0.91,
            }],
        }]));

        let body = render_section(&response, Section::LinkedEntities);
        let item = &body.items()[0];
        assert_eq!(item.text, "Lisbon (en)");
        assert_eq!(item.span, Some(TextSpan::new(35, 6)));
        assert_eq!(item.tier, Some(ConfidenceTier::High));
        assert!(item.details.contains(&"Data Source: Wikipedia".to_string()));
        assert!(item.details.contains(&"Matches: Lisbon".to_string()));
    }

    #[test]
    fn sentiment_fields_when_present() {
        let mut response = sample_response();
        response.sentiment = Some(ResultWrapper::ok(SentimentResult {
            sentiment: "positive".to_string(),
            confidence_score: 0.7,
        }));
        let SectionBody::Fields(fields) = render_section(&response, Section::Sentiment) else {
            panic!("expected fields");
        };
        assert_eq!(fields[0].value, "positive");
        assert_eq!(fields[1].tier, Some(ConfidenceTier::Medium));
    }

    #[test]
    fn toggle_opens_one_section_at_a_time() {
        let mut toggle = SectionToggle::new();
        assert_eq!(toggle.open_section(), None);

        toggle.toggle(Section::Pii);
        assert!(toggle.is_open(Section::Pii));

        toggle.toggle(Section::Entities);
        assert!(toggle.is_open(Section::Entities));
        assert!(!toggle.is_open(Section::Pii));

        toggle.toggle(Section::Entities);
        assert_eq!(toggle.open_section(), None);
    }

    #[test]
    fn format_score_uses_two_decimals() {
        assert_eq!(format_score(0.987), "0.99");
        assert_eq!(format_score(1.0), "1.00");
    }

    #[test]
    fn plain_rendering_includes_highlighted_source_text() {
        let lines = render_plain(&sample_response());
        assert!(lines.iter().any(|l| l == "== PII Entities =="));
        assert!(lines.iter().any(|l| l.contains("Email \"ana@example.com\" [medium]")));
        assert!(lines.iter().any(|l| l.contains("Error: quota exceeded")));
        assert!(lines.iter().any(|l| l == "  No data"));
    }

    #[test]
    fn plain_rendering_of_failed_response_leads_with_error() {
        let lines = render_plain(&AnalysisResponse::failure("No text provided for analysis"));
        assert_eq!(lines[0], "Error: No text provided for analysis");
        assert!(lines.iter().any(|l| l == "== Linked Entities =="));
        assert!(lines.iter().filter(|l| *l == "  No data").count() == Section::ALL.len());
    }

    #[test]
    fn plain_rendering_keeps_categories_alongside_top_level_error() {
        let response = AnalysisResponse {
            has_error: true,
            error: None,
            ..sample_response()
        };

        let lines = render_plain(&response);

        assert_eq!(lines[0], "Error: Unknown error");
        assert!(lines.iter().any(|l| l == "  Name: English"));
        assert!(lines.iter().any(|l| l == "  Error: quota exceeded"));
        assert!(lines.iter().any(|l| l.contains("Email \"ana@example.com\" [medium]")));
    }
}
