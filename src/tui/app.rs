use std::time::Duration;

use time::OffsetDateTime;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::models::{AnalysisResponse, TextSpan};
use crate::render::{Section, SectionBody, SectionToggle, render_section};
use crate::worker::AnalysisOutcome;

/// Application state for the TUI.
///
/// Holds the input text, debounce state, the latest analysis and the insights
/// cursor.
#[derive(Debug, Clone)]
pub struct App {
    /// Text being analyzed
    text: String,
    /// Keystroke debouncer gating requests
    debouncer: Debouncer,
    /// Pause required after the last keystroke before a request fires
    debounce: Duration,
    /// Whether a result is awaited for the current text
    loading: bool,
    /// Latest applied response
    result: Option<AnalysisResponse>,
    /// When the latest response arrived
    analyzed_at: Option<OffsetDateTime>,
    /// Currently focused panel
    focus: Focus,
    /// Which section is expanded
    sections: SectionToggle,
    /// Cursor position in `rows()`; this row is the hovered one
    cursor: usize,
    /// Item pinned with Enter, highlighted while nothing else is hovered
    selected: Option<(Section, usize)>,
    /// Show the service's redacted text instead of the raw input
    show_redacted: bool,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Text input is focused (typing edits the text)
    Input,
    /// Insights panel is focused (j/k moves the cursor, Enter toggles)
    Insights,
}

/// One navigable line of the insights panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// A section header
    Section(Section),
    /// The `n`-th item of the open section
    Item(Section, usize),
}

impl App {
    /// Creates a new App that waits `debounce` after the last keystroke.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use textlens::tui::{App, Focus};
    ///
    /// let app = App::new(Duration::from_millis(500));
    /// assert_eq!(app.text(), "");
    /// assert_eq!(app.focus(), Focus::Input);
    /// assert!(!app.is_loading());
    /// ```
    pub fn new(debounce: Duration) -> Self {
        Self {
            text: String::new(),
            debouncer: Debouncer::new(),
            debounce,
            loading: false,
            result: None,
            analyzed_at: None,
            focus: Focus::Input,
            sections: SectionToggle::new(),
            cursor: 0,
            selected: None,
            show_redacted: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while the user is still inside the debounce window.
    pub fn is_typing(&self) -> bool {
        self.debouncer.is_typing(self.debounce)
    }

    pub fn result(&self) -> Option<&AnalysisResponse> {
        self.result.as_ref()
    }

    pub fn analyzed_at(&self) -> Option<OffsetDateTime> {
        self.analyzed_at
    }

    pub fn sections(&self) -> &SectionToggle {
        &self.sections
    }

    pub fn selected(&self) -> Option<(Section, usize)> {
        self.selected
    }

    pub fn show_redacted(&self) -> bool {
        self.show_redacted
    }

    /// Appends a character to the input and schedules an analysis.
    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.on_text_changed();
    }

    /// Removes the last character from the input and schedules an analysis.
    pub fn pop_char(&mut self) {
        if self.text.pop().is_some() {
            self.on_text_changed();
        }
    }

    /// Replaces the whole input, e.g. with text passed on the command line.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.on_text_changed();
    }

    /// Any edit invalidates the shown result. Blank text sends nothing.
    fn on_text_changed(&mut self) {
        self.result = None;
        self.analyzed_at = None;
        self.selected = None;
        self.cursor = 0;

        if self.text.trim().is_empty() {
            self.debouncer.cancel();
            self.loading = false;
        } else {
            self.debouncer.mark_changed();
            self.loading = true;
        }
    }

    /// Returns the request to send if the debounce window has passed.
    pub fn take_pending_request(&mut self) -> Option<(u64, String)> {
        self.debouncer
            .take_ready(self.debounce)
            .map(|generation| (generation, self.text.clone()))
    }

    /// Applies a finished request. Returns `false` if it answered older text.
    pub fn apply_outcome(&mut self, outcome: AnalysisOutcome) -> bool {
        if !self.debouncer.is_current(outcome.generation) {
            debug!(
                generation = outcome.generation,
                current = self.debouncer.generation(),
                "discarding stale analysis"
            );
            return false;
        }

        let response = match outcome.result {
            Ok(response) => response,
            Err(e) => AnalysisResponse::failure(format!("Error fetching data: {e}")),
        };
        self.show_response(response, outcome.completed_at);
        true
    }

    /// Fails the request for `generation` without a response from the service.
    ///
    /// Returns `false` if newer text has been typed since.
    pub fn fail_request(&mut self, generation: u64, reason: impl std::fmt::Display) -> bool {
        if !self.debouncer.is_current(generation) {
            return false;
        }
        let response = AnalysisResponse::failure(format!("Error fetching data: {reason}"));
        self.show_response(response, OffsetDateTime::now_utc());
        true
    }

    /// Generation of the newest text.
    pub fn generation(&self) -> u64 {
        self.debouncer.generation()
    }

    fn show_response(&mut self, response: AnalysisResponse, at: OffsetDateTime) {
        self.result = Some(response);
        self.analyzed_at = Some(at);
        self.loading = false;
        self.clamp_cursor();
    }

    /// Navigable rows: every section header, plus the items of the open section.
    ///
    /// Empty while loading or before the first result.
    pub fn rows(&self) -> Vec<Row> {
        let Some(result) = self.visible_result() else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for section in Section::ALL {
            rows.push(Row::Section(section));
            if self.sections.is_open(section) {
                let body = render_section(result, section);
                rows.extend((0..body.items().len()).map(|i| Row::Item(section, i)));
            }
        }
        rows
    }

    /// The result shown in the insights panel, if any.
    pub fn visible_result(&self) -> Option<&AnalysisResponse> {
        if self.loading {
            None
        } else {
            self.result.as_ref()
        }
    }

    /// The row under the cursor.
    pub fn hovered(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn cursor_down(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor + 1 >= len {
            0
        } else {
            self.cursor + 1
        };
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = match self.cursor {
            0 => len - 1,
            i => (i - 1).min(len - 1),
        };
    }

    /// Enter on a header toggles the section; on an item it pins or unpins it.
    pub fn activate(&mut self) {
        match self.hovered() {
            Some(Row::Section(section)) => {
                self.sections.toggle(section);
                if self
                    .selected
                    .is_some_and(|(selected, _)| !self.sections.is_open(selected))
                {
                    self.selected = None;
                }
                self.clamp_cursor();
            }
            Some(Row::Item(section, index)) => {
                self.selected = if self.selected == Some((section, index)) {
                    None
                } else {
                    Some((section, index))
                };
            }
            None => {}
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Span to highlight in the input: the hovered item, else the pinned one.
    pub fn highlighted_span(&self) -> Option<TextSpan> {
        let result = self.visible_result()?;

        if self.focus == Focus::Insights
            && let Some(Row::Item(section, index)) = self.hovered()
            && let Some(span) = item_span(result, section, index)
        {
            return Some(span);
        }

        let (section, index) = self.selected?;
        item_span(result, section, index)
    }

    /// Text drawn in the input panel.
    pub fn display_text(&self) -> &str {
        if self.show_redacted
            && let Some(redacted) = self
                .visible_result()
                .and_then(|r| r.redacted_text.as_deref())
        {
            return redacted;
        }
        &self.text
    }

    pub fn toggle_redacted(&mut self) {
        self.show_redacted = !self.show_redacted;
    }

    /// Cycles focus between the input and insights panels.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Insights,
            Focus::Insights => Focus::Input,
        };
    }

    /// With two panels, reverse order is the same cycle.
    pub fn prev_focus(&mut self) {
        self.next_focus();
    }

    /// Returns focus to the input (Esc key behavior).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::Input;
    }

    /// Unpins the selected item (Esc key behavior).
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

fn item_span(result: &AnalysisResponse, section: Section, index: usize) -> Option<TextSpan> {
    match render_section(result, section) {
        SectionBody::Items(items) => items.get(index).and_then(|item| item.span),
        _ => None,
    }
}
