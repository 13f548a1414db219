use crate::app::handlers::{files, submit, voice};
use crate::app::state::{ComposerMode, InputState, MenuKey};
use crate::app::util::sanitize_paste;
use crate::app::{AppState, Services};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

fn handle_input_edit_key(
    input: &mut InputState,
    key: KeyCode,
    modifiers: KeyModifiers,
    allow_history: bool,
    allow_ctrl_j: bool,
) -> Option<bool> {
    match (key, modifiers) {
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.kill_line();
            Some(true)
        }
        (KeyCode::Char('k'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.kill_to_end();
            Some(true)
        }
        (KeyCode::Char('w'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.delete_word_back();
            Some(true)
        }
        (KeyCode::Char('a'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.move_home();
            Some(true)
        }
        (KeyCode::Char('e'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.move_end();
            Some(true)
        }
        (KeyCode::Char('j'), mods) if allow_ctrl_j && mods.contains(KeyModifiers::CONTROL) => {
            input.insert_char('\n');
            Some(true)
        }
        (KeyCode::Up, _) => {
            if input.move_up() {
                Some(true)
            } else if allow_history {
                Some(input.history_up())
            } else {
                Some(false)
            }
        }
        (KeyCode::Down, _) => {
            if input.move_down() {
                Some(true)
            } else if allow_history {
                Some(input.history_down())
            } else {
                Some(false)
            }
        }
        (KeyCode::Left, _) => {
            input.move_left();
            Some(true)
        }
        (KeyCode::Right, _) => {
            input.move_right();
            Some(true)
        }
        (KeyCode::Home, _) => {
            input.move_home();
            Some(true)
        }
        (KeyCode::End, _) => {
            input.move_end();
            Some(true)
        }
        (KeyCode::Delete, _) => {
            input.delete();
            Some(true)
        }
        (KeyCode::Backspace, _) => {
            input.backspace();
            Some(true)
        }
        (KeyCode::Char(ch), mods) => {
            if mods.contains(KeyModifiers::CONTROL) || mods.contains(KeyModifiers::ALT) {
                return Some(false);
            }
            input.insert_char(ch);
            Some(true)
        }
        _ => None,
    }
}

fn handle_prompt_key(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.prompt_dialog = None;
            true
        }
        KeyCode::Enter => {
            files::submit_prompt(app);
            true
        }
        code => {
            let Some(dialog) = app.prompt_dialog.as_mut() else {
                return false;
            };
            handle_input_edit_key(&mut dialog.input, code, key.modifiers, false, false)
                .unwrap_or(false)
        }
    }
}

fn menu_key(code: KeyCode) -> Option<MenuKey> {
    match code {
        KeyCode::Down => Some(MenuKey::Down),
        KeyCode::Up => Some(MenuKey::Up),
        KeyCode::Tab | KeyCode::Enter => Some(MenuKey::Select),
        KeyCode::Esc => Some(MenuKey::Dismiss),
        _ => None,
    }
}

fn handle_shortcut(app: &mut AppState, services: &mut Services, key: KeyEvent) -> Option<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('o') if ctrl => {
            files::open_file_prompt(app);
            Some(true)
        }
        KeyCode::Char('l') if ctrl => Some(submit::request_reset(app, services)),
        KeyCode::Char('t') if ctrl => Some(voice::toggle_voice(app, services)),
        KeyCode::Char('r') if ctrl => Some(voice::toggle_read_aloud(app, services)),
        KeyCode::Char('v') if alt => {
            files::paste_clipboard_image(app);
            Some(true)
        }
        KeyCode::Char('h') if alt => {
            app.toggle_status_line_mode();
            Some(true)
        }
        KeyCode::Char(digit @ '1'..='9') if alt => {
            let index = digit as usize - '1' as usize;
            files::remove_attachment(app, index);
            Some(true)
        }
        KeyCode::PageUp => {
            app.scroll_page_up();
            Some(true)
        }
        KeyCode::PageDown => {
            app.scroll_page_down();
            Some(true)
        }
        _ => None,
    }
}

/// Routes one key press. Returns true when the screen needs a redraw.
pub fn handle_key(app: &mut AppState, services: &mut Services, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return true;
    }
    if app.prompt_dialog.is_some() {
        return handle_prompt_key(app, key);
    }

    if app.composer.mode() == ComposerMode::CommandMenuOpen {
        if let Some(menu_key) = menu_key(key.code) {
            return app.composer.handle_menu_key(menu_key);
        }
    }

    if let Some(redraw) = handle_shortcut(app, services, key) {
        return redraw;
    }

    if key.code == KeyCode::Enter {
        if key.modifiers.is_empty() {
            return submit::submit(app, services);
        }
        app.composer.input.insert_char('\n');
        app.composer.on_text_changed();
        return true;
    }

    let before = app.composer.input.buffer.clone();
    let handled =
        handle_input_edit_key(&mut app.composer.input, key.code, key.modifiers, true, true);
    if app.composer.input.buffer != before {
        app.composer.on_text_changed();
    }
    handled.unwrap_or(false)
}

/// Bracketed paste: a drop of existing files attaches them, anything else is text.
pub fn handle_paste(app: &mut AppState, text: &str) -> bool {
    if let Some(dialog) = app.prompt_dialog.as_mut() {
        dialog.input.insert_str(&sanitize_paste(text).replace('\n', " "));
        return true;
    }
    if files::handle_drop_paste(app, text) {
        return true;
    }
    let sanitized = sanitize_paste(text);
    if sanitized.is_empty() {
        return false;
    }
    app.composer.input.insert_str(&sanitized);
    app.composer.on_text_changed();
    true
}
