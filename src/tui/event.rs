//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Key behavior
//! depends on which panel has focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `true` if the application should quit, `false` otherwise.
///
/// # Event Handling
///
/// - `Ctrl+C`: Quit application (from any focus state)
/// - `Tab` / `Shift+Tab`: Switch between the input and insights panels
/// - `Esc`: Return to the input and unpin the selected item
/// - When `Input` focused: characters, Enter and Backspace edit the text
/// - When `Insights` focused: j/k or arrows move, Enter/Space toggle, `r` redacts, `q` quits
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use textlens::tui::{App, event::handle_key_event};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new(Duration::from_millis(500));
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert!(handle_key_event(&mut app, key));
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if key.code == KeyCode::Tab {
        app.next_focus();
        return false;
    }
    if key.code == KeyCode::BackTab {
        app.prev_focus();
        return false;
    }

    if key.code == KeyCode::Esc {
        app.reset_focus();
        app.clear_selection();
        return false;
    }

    match app.focus() {
        Focus::Input => {
            handle_input(app, key);
            false
        }
        Focus::Insights => handle_insights(app, key),
    }
}

/// Handles keyboard input when the text input is focused.
fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_char(c);
        }
        KeyCode::Enter => app.push_char('\n'),
        KeyCode::Backspace => app.pop_char(),
        _ => {}
    }
}

/// Handles keyboard input when the insights panel is focused.
fn handle_insights(app: &mut App, key: KeyEvent) -> bool {
    if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
        return false;
    }
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('r') => app.toggle_redacted(),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisResponse, Entity, ResultWrapper, TextSpan};
    use crate::render::Section;
    use crate::tui::app::Row;
    use crate::worker::AnalysisOutcome;
    use std::time::Duration;
    use time::OffsetDateTime;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn analyzed_app(text: &str) -> App {
        let mut app = App::new(Duration::ZERO);
        type_text(&mut app, text);
        let (generation, _) = app.take_pending_request().unwrap();
        app.apply_outcome(AnalysisOutcome {
            generation,
            result: Ok(AnalysisResponse {
                entities: Some(ResultWrapper::ok(vec![Entity {
                    category: "Organization".to_string(),
                    confidence_score: 0.93,
                    offset: 0,
                    length: 7,
                }])),
                ..AnalysisResponse::default()
            }),
            completed_at: OffsetDateTime::now_utc(),
        });
        app
    }

    #[test]
    fn ctrl_c_quits_from_any_focus() {
        let mut app = App::new(Duration::ZERO);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key_event(&mut app, ctrl_c));

        app.next_focus();
        assert!(handle_key_event(&mut app, ctrl_c));
    }

    #[test]
    fn q_is_text_in_input_but_quits_in_insights() {
        let mut app = App::new(Duration::ZERO);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.text(), "q");

        press(&mut app, KeyCode::Tab);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_edits_text_including_newlines() {
        let mut app = App::new(Duration::ZERO);
        type_text(&mut app, "Hi");
        press(&mut app, KeyCode::Enter);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT),
        );
        assert_eq!(app.text(), "Hi\nT");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.text(), "Hi\n");
    }

    #[test]
    fn control_chords_do_not_insert_text() {
        let mut app = App::new(Duration::ZERO);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
        );
        assert_eq!(app.text(), "");
    }

    #[test]
    fn tab_and_back_tab_switch_focus() {
        let mut app = App::new(Duration::ZERO);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Insights);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
        );
        assert_eq!(app.focus(), Focus::Input);
    }

    #[test]
    fn navigation_keys_move_and_toggle_in_insights() {
        let mut app = analyzed_app("Mozilla ships Firefox");
        press(&mut app, KeyCode::Tab);

        for _ in 0..4 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.hovered(), Some(Row::Section(Section::Entities)));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.hovered(), Some(Row::Item(Section::Entities, 0)));
        assert_eq!(app.highlighted_span(), Some(TextSpan::new(0, 7)));

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.selected(), Some((Section::Entities, 0)));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.hovered(), Some(Row::Section(Section::Entities)));
    }

    #[test]
    fn esc_returns_to_input_and_unpins() {
        let mut app = analyzed_app("Mozilla ships Firefox");
        press(&mut app, KeyCode::Tab);
        for _ in 0..4 {
            press(&mut app, KeyCode::Char('j'));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(app.selected().is_some());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus(), Focus::Input);
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn r_toggles_redacted_view_in_insights() {
        let mut app = App::new(Duration::ZERO);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.show_redacted());
    }
}
