//! UI rendering functions for the TUI.
//!
//! Draws the input panel on the left, the insights accordion on the right and
//! a shortcut bar along the bottom.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use time::macros::format_description;

use super::app::{App, Focus, Row};
use crate::highlight::Highlight;
use crate::models::ConfidenceTier;
use crate::render::{Field, Item, SectionBody, render_section};

const PLACEHOLDER: &str = "Type your text here...";

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panels
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[0]);

    render_input(frame, app, panels[0]);
    render_insights(frame, app, panels[1]);
    render_shortcut_bar(frame, app, main_chunks[1]);
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
}

/// Color used for an item or field of the given tier.
pub fn tier_style(tier: ConfidenceTier) -> Style {
    match tier {
        ConfidenceTier::High => Style::default().fg(Color::Green),
        ConfidenceTier::Medium => Style::default().fg(Color::Yellow),
        ConfidenceTier::Low => Style::default().fg(Color::Red),
    }
}

/// Renders the text input with the highlighted span and a cursor indicator.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::Input;

    let mut title = if app.show_redacted() {
        "Enter Text (redacted)".to_string()
    } else {
        "Enter Text".to_string()
    };
    if app.is_typing() {
        title.push_str(" - typing");
    }

    let content = if app.text().is_empty() {
        let mut line = vec![Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        )];
        if is_focused {
            line.insert(0, Span::raw("█"));
        }
        Text::from(Line::from(line))
    } else {
        let text = app.display_text();
        let highlight = match app.highlighted_span() {
            Some(span) => Highlight::split(text, span),
            None => Highlight::none(text),
        };
        let mut content = highlighted_text(&highlight);
        if is_focused {
            match content.lines.last_mut() {
                Some(line) => line.spans.push(Span::raw("█")),
                None => content.lines.push(Line::from("█")),
            }
        }
        content
    };

    let paragraph = Paragraph::new(content)
        .block(panel_block(title, is_focused))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Builds multi-line text from the three highlight pieces, keeping line breaks.
pub fn highlighted_text(highlight: &Highlight<'_>) -> Text<'static> {
    let marked = Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = vec![Line::default()];
    for (piece, style) in [
        (highlight.before, Style::default()),
        (highlight.highlight, marked),
        (highlight.after, Style::default()),
    ] {
        for (i, segment) in piece.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !segment.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.spans.push(Span::styled(segment.to_string(), style));
            }
        }
    }

    Text::from(lines)
}

/// Renders the insights panel: loading state, top-level error and the sections.
fn render_insights(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::Insights;

    let mut title = "Insights".to_string();
    if let Some(at) = app.analyzed_at()
        && let Ok(stamp) = at.format(format_description!("[hour]:[minute]:[second]"))
    {
        title.push_str(&format!(" @ {stamp} UTC"));
    }

    let mut text = Text::default();
    let mut cursor_line = 0usize;
    let inner_width = usize::from(area.width.saturating_sub(2));

    if app.is_loading() {
        text.lines.push(Line::from("Loading..."));
    } else if let Some(result) = app.result() {
        if result.has_error {
            text.lines.push(Line::from(Span::styled(
                format!("Error: {}", result.error.as_deref().unwrap_or("Unknown error")),
                Style::default().fg(Color::Red),
            )));
            text.lines.push(Line::from(""));
        }

        let hovered = if is_focused { app.hovered() } else { None };
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

        for row in app.rows() {
            let is_hovered = hovered == Some(row);
            if is_hovered {
                cursor_line = text.lines.len();
            }
            match row {
                Row::Section(section) => {
                    let open = app.sections().is_open(section);
                    let marker = if open { "▾" } else { "▸" };
                    let mut style = Style::default().add_modifier(Modifier::BOLD);
                    if open {
                        style = style.fg(Color::Cyan);
                    }
                    if is_hovered {
                        style = style.patch(cursor_style);
                    }
                    text.lines.push(Line::from(Span::styled(
                        format!("{marker} {}", section.label()),
                        style,
                    )));

                    if open {
                        let body = render_section(result, section);
                        push_non_item_body(&mut text, &body);
                    }
                }
                Row::Item(section, index) => {
                    let body = render_section(result, section);
                    if let Some(item) = body.items().get(index) {
                        let pinned = app.selected() == Some((section, index));
                        push_item(&mut text, item, is_hovered, pinned, inner_width);
                    }
                }
            }
        }
    }

    // Keep the cursor row visible. Lines are not wrapped, so one line is one row.
    let inner_height = usize::from(area.height.saturating_sub(2));
    let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(text)
        .block(panel_block(title, is_focused))
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Lines for bodies that are not item lists. Items become their own rows.
fn push_non_item_body(text: &mut Text<'static>, body: &SectionBody) {
    let dim = Style::default().fg(Color::DarkGray);
    match body {
        SectionBody::NoData => text.lines.push(Line::from(Span::styled("  No data", dim))),
        SectionBody::NoResult => text.lines.push(Line::from(Span::styled("  No result", dim))),
        SectionBody::Error(message) => text.lines.push(Line::from(Span::styled(
            format!("  Error: {message}"),
            Style::default().fg(Color::Red),
        ))),
        SectionBody::Fields(fields) => {
            for field in fields {
                text.lines.push(field_line(field));
            }
        }
        SectionBody::Items(_) => {}
    }
}

fn field_line(field: &Field) -> Line<'static> {
    let value_style = field.tier.map(tier_style).unwrap_or_default();
    Line::from(vec![
        Span::styled(
            format!("  {}: ", field.label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(field.value.clone(), value_style),
    ])
}

fn push_item(text: &mut Text<'static>, item: &Item, hovered: bool, pinned: bool, width: usize) {
    let bullet = if pinned { "  * " } else { "  - " };
    let mut style = item.tier.map(tier_style).unwrap_or_default();
    if hovered {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![Span::raw(bullet), Span::styled(item.text.clone(), style)];
    if let Some(tier) = item.tier {
        spans.push(Span::styled(
            format!(" [{tier}]"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    text.lines.push(Line::from(spans));

    for detail in &item.details {
        text.lines.push(Line::from(Span::styled(
            truncate(&format!("      {detail}"), width),
            Style::default().fg(Color::DarkGray),
        )));
    }
}

/// Cuts `line` to `width` characters, ending with an ellipsis when shortened.
fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Shows context-aware keyboard shortcuts based on current focus state.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("Ctrl+C", key_style),
        Span::raw(": quit"),
        Span::styled(" | ", sep_style),
        Span::styled("Tab", key_style),
        Span::raw(": switch panel"),
        Span::styled(" | ", sep_style),
        Span::styled("Esc", key_style),
        Span::raw(": back to input"),
    ];

    match app.focus() {
        Focus::Insights => {
            for (key, action) in [
                ("j/k", "move"),
                ("Enter", "expand/pin"),
                ("r", "redacted"),
                ("q", "quit"),
            ] {
                spans.push(Span::styled(" | ", sep_style));
                spans.push(Span::styled(key, key_style));
                spans.push(Span::raw(format!(": {action}")));
            }
        }
        Focus::Input => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
