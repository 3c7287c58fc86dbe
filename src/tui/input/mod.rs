mod edit;
mod mouse;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::NodeStore;

use super::app::App;

pub use mouse::handle_mouse;

/// Handle a key event: the inline editor owns the keyboard while open
pub fn handle_key<S: NodeStore>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    let key = normalize_key(key);
    if app.editor.is_some() {
        edit::handle_edit(app, key);
    } else if app.show_help {
        // Any key closes the help overlay
        app.show_help = false;
    } else {
        navigate::handle_navigate(app, key);
    }
}

/// Handle a bracketed paste. Only the inline editor accepts pasted text;
/// newlines become spaces.
pub fn handle_paste<S: NodeStore>(app: &mut App<S>, text: &str) {
    let Some(buf) = app.editor.as_mut() else {
        return;
    };
    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' | '\t' => buf.insert(' '),
            c => buf.insert(c),
        }
    }
}

/// Terminals report Shift+Tab as BackTab and shifted letters as uppercase
/// with SHIFT set; fold both into one shape.
fn normalize_key(key: KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::BackTab => KeyEvent::new(KeyCode::Tab, key.modifiers | KeyModifiers::SHIFT),
        KeyCode::Char(c) if c.is_ascii_uppercase() => {
            KeyEvent::new(KeyCode::Char(c), key.modifiers | KeyModifiers::SHIFT)
        }
        _ => key,
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn shift(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::SHIFT)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn chr(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }
}
