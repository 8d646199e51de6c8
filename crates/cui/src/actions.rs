use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => app.show_help = false,
        InputAction::CursorLeft => app.move_cursor(false),
        InputAction::CursorRight => app.move_cursor(true),
        InputAction::CursorFirst => app.jump_cursor(false),
        InputAction::CursorLast => app.jump_cursor(true),
        InputAction::SelectCard => app.select_under_cursor(),
        InputAction::ClickSlot(index) => app.click_slot(index),
        InputAction::Redraw => app.redraw(),
    }
}
