use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    CursorLeft,
    CursorRight,
    CursorFirst,
    CursorLast,
    SelectCard,
    ClickSlot(usize),
    Redraw,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Left => InputAction::CursorLeft,
        KeyCode::Right => InputAction::CursorRight,
        KeyCode::Home => InputAction::CursorFirst,
        KeyCode::End => InputAction::CursorLast,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::SelectCard,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('h') => InputAction::CursorLeft,
        KeyCode::Char('l') => InputAction::CursorRight,
        KeyCode::Char('r') => InputAction::Redraw,
        KeyCode::Char(digit @ '1'..='9') => {
            InputAction::ClickSlot(digit as usize - '1' as usize)
        }
        _ => InputAction::None,
    }
}
