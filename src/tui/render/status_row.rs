use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::NodeStore;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row<S: NodeStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match &app.status {
        Some(msg) => {
            let fg = if msg.is_error {
                app.theme.red
            } else {
                app.theme.text_bright
            };
            vec![Span::styled(format!(" {}", msg.text), Style::default().fg(fg).bg(bg))]
        }
        None => vec![
            Span::styled(
                format!(" {}", app.name),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled(
                format!(
                    "  {}  {} nodes",
                    app.flow.direction(),
                    app.flow.nodes().len()
                ),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ],
    };

    let hint = if app.editor.is_some() {
        "Enter save  Esc cancel "
    } else {
        "Tab child  \u{21E7}Tab sibling  ? help "
    };
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status_line(app: &App<crate::io::store::MemoryStore>, w: u16) -> String {
        render_to_string(w, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn shows_map_summary_and_hint() {
        let app = sample_app();
        let line = status_line(&app, TERM_W);
        assert!(line.starts_with(" Test  left-right  4 nodes"));
        assert!(line.ends_with("? help"));
    }

    #[test]
    fn message_replaces_summary() {
        let mut app = sample_app();
        app.set_error("save failed: disk full");
        let line = status_line(&app, TERM_W);
        assert!(line.starts_with(" save failed: disk full"));
        assert!(!line.contains("4 nodes"));
    }

    #[test]
    fn editing_hint() {
        let mut app = sample_app();
        app.flow.select("root");
        app.begin_edit();
        assert!(status_line(&app, TERM_W).ends_with("Enter save  Esc cancel"));
    }

    #[test]
    fn narrow_row_drops_hint() {
        let app = sample_app();
        let line = status_line(&app, 30);
        assert!(!line.contains("help"));
    }
}
