//! Key mapping for the terminal front end.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// UI-agnostic input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiInput {
    /// Space: start, flap or restart.
    Primary,
    Up,
    Down,
    Left,
    Right,
    Confirm,
    /// Esc / P: pause, resume or go back.
    Back,
    Reset,
    Quit,
    Other,
}

pub fn map_key(key: KeyEvent) -> UiInput {
    if key.kind == KeyEventKind::Release {
        return UiInput::Other;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return UiInput::Quit;
    }
    match key.code {
        KeyCode::Char(' ') => UiInput::Primary,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => UiInput::Up,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => UiInput::Down,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => UiInput::Left,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => UiInput::Right,
        KeyCode::Enter => UiInput::Confirm,
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => UiInput::Back,
        KeyCode::Char('r') | KeyCode::Char('R') => UiInput::Reset,
        KeyCode::Char('q') | KeyCode::Char('Q') => UiInput::Quit,
        _ => UiInput::Other,
    }
}
