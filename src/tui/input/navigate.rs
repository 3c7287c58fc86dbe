use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::flow::{Key, KeyInput};
use crate::io::store::NodeStore;
use crate::tui::app::App;

/// Canvas mode: a few TUI-only keys, everything else goes to the flow
pub(super) fn handle_navigate<S: NodeStore>(app: &mut App<S>, key: KeyEvent) {
    let ctrl = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if !ctrl {
        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('d') => {
                app.cycle_direction();
                return;
            }
            KeyCode::Char('e') => {
                app.begin_edit();
                return;
            }
            KeyCode::Char('?') => {
                app.show_help = true;
                return;
            }
            _ => {}
        }
    }

    let Some(flow_key) = flow_key(key.code) else {
        return;
    };
    let result = app.flow.handle_key(KeyInput {
        key: flow_key,
        shift,
        ctrl,
    });
    app.apply(result);
}

fn flow_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Tab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Delete => Key::Delete,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}
