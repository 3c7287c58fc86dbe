use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::NodeStore;
use crate::tui::app::App;

/// Inline editor keys. Enter commits, Esc cancels.
pub(super) fn handle_edit<S: NodeStore>(app: &mut App<S>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        code => {
            let Some(buf) = app.editor.as_mut() else {
                return;
            };
            match code {
                KeyCode::Backspace => buf.backspace(),
                KeyCode::Delete => buf.delete(),
                KeyCode::Left => buf.left(),
                KeyCode::Right => buf.right(),
                KeyCode::Home => buf.home(),
                KeyCode::End => buf.end(),
                KeyCode::Char('a') if ctrl => buf.home(),
                KeyCode::Char('e') if ctrl => buf.end(),
                KeyCode::Char('u') if ctrl => buf.kill_to_start(),
                KeyCode::Char(c) if !ctrl => buf.insert(c),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::handle_key;
    use super::super::test_helpers::*;
    use crate::tui::render::test_helpers::sample_app;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_commits_on_enter() {
        let mut app = sample_app();
        app.flow.select("child2");
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, ctrl('u'));
        for c in "Two".chars() {
            handle_key(&mut app, chr(c));
        }
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.editor.is_none());
        assert_eq!(app.flow.node("child2").unwrap().content, "Two");
    }

    #[test]
    fn esc_discards_changes() {
        let mut app = sample_app();
        app.flow.select("child2");
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.editor.is_none());
        assert!(!app.flow.is_editing());
        assert_eq!(app.flow.node("child2").unwrap().content, "Child 2");
    }

    #[test]
    fn shortcuts_type_text_while_editing() {
        let mut app = sample_app();
        app.flow.select("child2");
        handle_key(&mut app, key(KeyCode::Enter));
        // q, d and space are text here, not commands
        handle_key(&mut app, chr(' '));
        handle_key(&mut app, chr('q'));
        handle_key(&mut app, chr('d'));
        handle_key(&mut app, key(KeyCode::Tab));
        assert!(!app.should_quit);
        assert_eq!(app.editor.as_ref().unwrap().text, "Child 2 qd");
        assert_eq!(app.flow.nodes().len(), 4);
    }
}
