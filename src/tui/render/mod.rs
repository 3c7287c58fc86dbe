pub mod canvas;
pub mod help_overlay;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::io::store::NodeStore;

use super::app::App;

/// Main render function: canvas above, status row below, help on top
pub fn render<S: NodeStore>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: canvas | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // canvas
            Constraint::Length(1), // status row
        ])
        .split(area);

    canvas::render_canvas(frame, app, chunks[0]);

    // Help overlay (rendered on top of the canvas)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn full_screen_has_canvas_and_status() {
        let mut app = sample_app();
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let last = out.lines().last().unwrap();
        assert!(out.contains("│Root"));
        assert!(last.contains("Test"));
        assert!(last.contains("left-right"));
        assert_eq!(app.canvas_area.height, TERM_H - 1);
    }

    #[test]
    fn help_overlay_draws_over_canvas() {
        let mut app = sample_app();
        app.show_help = true;
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Add child"));
    }
}
