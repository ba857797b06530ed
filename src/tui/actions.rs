use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

/// Something a key press asks the editor to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Cancel,
    EnterEdit,
    /// Start editing, replacing the cell with the typed character
    Replace(char),
    CommitEdit,
    EnterCommand,
    ExecuteCommand,
    ClearCell,
    Move(i32, i32),
    MoveGroup(i32),
    Page(i32),
    HomeCol,
    EndCol,
    GotoFirst,
    GotoLast,
    Save,
}

/// Map a key to an action in `mode`.
///
/// Plain characters in Edit and Command mode are not bound; they fall
/// through to text entry.
pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('s') if ctrl => Some(Action::Save),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::Move(-1, 0)),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::Move(1, 0)),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Move(0, -1)),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Move(0, 1)),
            KeyCode::Tab => Some(Action::MoveGroup(1)),
            KeyCode::BackTab => Some(Action::MoveGroup(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::Char('0') | KeyCode::Home => Some(Action::HomeCol),
            KeyCode::Char('$') | KeyCode::End => Some(Action::EndCol),
            KeyCode::Char('g') => Some(Action::GotoFirst),
            KeyCode::Char('G') => Some(Action::GotoLast),
            KeyCode::Char('i') | KeyCode::Enter | KeyCode::F(2) => Some(Action::EnterEdit),
            KeyCode::Char(c @ '1'..='9') => Some(Action::Replace(c)),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => Some(Action::ClearCell),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            _ => None,
        },
        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

fn prev_boundary(buffer: &str, mut pos: usize) -> usize {
    pos = pos.saturating_sub(1);
    while pos > 0 && !buffer.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn next_boundary(buffer: &str, mut pos: usize) -> usize {
    pos += 1;
    while pos < buffer.len() && !buffer.is_char_boundary(pos) {
        pos += 1;
    }
    pos.min(buffer.len())
}

/// Line editing on a buffer with a UTF-8 aware byte cursor.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left if *cursor > 0 => *cursor = prev_boundary(buffer, *cursor),
        KeyCode::Right if *cursor < buffer.len() => *cursor = next_boundary(buffer, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace if *cursor > 0 => {
            let start = prev_boundary(buffer, *cursor);
            buffer.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Delete if *cursor < buffer.len() => {
            let end = next_boundary(buffer, *cursor);
            buffer.drain(*cursor..end);
        }
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Cancel => match app.mode {
            Mode::Edit => {
                app.mode = Mode::Normal;
                app.edit_buffer.clear();
                app.edit_cursor = 0;
            }
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Normal => app.status_message.clear(),
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::Replace(c) => app.replace_with(c),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => {
            app.mode = Mode::Command;
            app.command_buffer.clear();
            app.command_cursor = 0;
        }
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }
        Action::ClearCell => app.clear_current_cell(),

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::MoveGroup(delta) => app.move_group(delta),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::HomeCol => {
            app.cursor_col = 0;
            app.update_viewport();
        }
        Action::EndCol => app.move_cursor(i32::MAX / 2, 0),
        Action::GotoFirst => app.goto_first(),
        Action::GotoLast => app.goto_last(),
        Action::Save => app.save(),
    }
    ApplyResult::Continue
}

pub fn handle_edit_text(app: &mut App, key: KeyEvent) {
    handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key);
}

pub fn handle_command_text(app: &mut App, key: KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::app;
    use shiftgrid_core::WorkTimeMode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Feed keys the way the event loop does.
    fn press(app: &mut App, codes: &[KeyCode]) -> ApplyResult {
        for code in codes {
            let key = key(*code);
            if let Some(action) = translate(app.mode, key) {
                if apply_action(app, action) == ApplyResult::Quit {
                    return ApplyResult::Quit;
                }
                continue;
            }
            match app.mode {
                Mode::Edit => handle_edit_text(app, key),
                Mode::Command => handle_command_text(app, key),
                Mode::Normal => {}
            }
        }
        ApplyResult::Continue
    }

    fn type_text(text: &str) -> Vec<KeyCode> {
        text.chars().map(KeyCode::Char).collect()
    }

    #[test]
    fn digits_start_an_edit() {
        let mut app = app(WorkTimeMode::Single, &["Ann"]);
        press(&mut app, &[KeyCode::Char('8'), KeyCode::Enter, KeyCode::Char('l')]);
        press(&mut app, &[KeyCode::Char('1'), KeyCode::Char('6'), KeyCode::Enter]);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc().unwrap().group_result(0, 0).unwrap(), 8);
    }

    #[test]
    fn escape_discards_edit() {
        let mut app = app(WorkTimeMode::Single, &["Ann"]);
        press(&mut app, &[KeyCode::Char('i'), KeyCode::Char('9'), KeyCode::Esc]);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc().unwrap().cell_display(&app.current_cell_ref()), "");
    }

    #[test]
    fn command_line_quits() {
        let mut app = app(WorkTimeMode::Single, &["Ann"]);
        let mut keys = vec![KeyCode::Char(':')];
        keys.extend(type_text("q!"));
        keys.push(KeyCode::Enter);
        assert_eq!(press(&mut app, &keys), ApplyResult::Quit);
    }

    #[test]
    fn command_line_editing_keys() {
        let mut app = app(WorkTimeMode::Single, &["Ann"]);
        let mut keys = vec![KeyCode::Char(':')];
        keys.extend(type_text("addcol Bobx"));
        keys.extend([KeyCode::Backspace, KeyCode::Home, KeyCode::Delete]);
        keys.extend(type_text("a"));
        keys.push(KeyCode::Enter);
        press(&mut app, &keys);
        assert_eq!(app.doc().unwrap().column_names, vec!["Ann", "Bob"]);
    }

    #[test]
    fn navigation_keys() {
        let mut app = app(WorkTimeMode::Double, &["Ann", "Bob"]);
        press(&mut app, &[KeyCode::Char('$'), KeyCode::Char('G')]);
        assert_eq!((app.cursor_row, app.cursor_col), (30, 7));
        press(&mut app, &[KeyCode::Char('0'), KeyCode::Char('g'), KeyCode::Tab]);
        assert_eq!((app.cursor_row, app.cursor_col), (0, 4));
        press(&mut app, &[KeyCode::BackTab, KeyCode::PageDown]);
        assert_eq!((app.cursor_row, app.cursor_col), (20, 0));
    }

    #[test]
    fn utf8_cursor_moves_by_char() {
        let mut buffer = "aé".to_string();
        let mut cursor = buffer.len();
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Left));
        assert_eq!(cursor, 1);
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Delete));
        assert_eq!(buffer, "a");
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Right));
        assert_eq!(cursor, 1);
    }
}
