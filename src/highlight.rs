//! Offset/length highlighting of the analyzed text.
//!
//! The service reports entity locations as character offsets into the text it
//! received. [`Highlight::split`] turns such a span into the three pieces the UI
//! draws: the text before the entity, the entity itself, and the rest.

use crate::models::TextSpan;

/// The analyzed text split around one highlighted span.
///
/// `before`, `highlight` and `after` always concatenate back to the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub before: &'a str,
    pub highlight: &'a str,
    pub after: &'a str,
}

impl<'a> Highlight<'a> {
    /// Splits `text` around `span`, counting offsets in characters.
    ///
    /// Spans reaching past the end are clamped, so a stale span from a previous
    /// analysis never panics against shorter text.
    ///
    /// # Examples
    ///
    /// ```
    /// use textlens::{Highlight, TextSpan};
    ///
    /// let h = Highlight::split("Visit Zürich today", TextSpan::new(6, 6));
    /// assert_eq!(h.before, "Visit ");
    /// assert_eq!(h.highlight, "Zürich");
    /// assert_eq!(h.after, " today");
    /// ```
    pub fn split(text: &'a str, span: TextSpan) -> Self {
        let start = byte_index(text, span.offset);
        let end = byte_index(text, span.end());

        Self {
            before: &text[..start],
            highlight: &text[start..end],
            after: &text[end..],
        }
    }

    /// The whole text with nothing highlighted.
    pub fn none(text: &'a str) -> Self {
        Self {
            before: text,
            highlight: "",
            after: "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.highlight.is_empty()
    }
}

/// Byte index of the `chars`-th character, or the text length when out of range.
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}
