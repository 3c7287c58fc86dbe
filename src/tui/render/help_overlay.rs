use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::io::store::NodeStore;
use crate::tui::app::App;

/// Render the help overlay (opened with ?)
pub fn render_help_overlay<S: NodeStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Structure", header_style)));
    add_binding(&mut lines, " Tab", "Add child", key_style, desc_style);
    add_binding(&mut lines, " Shift+Tab", "Add sibling", key_style, desc_style);
    add_binding(&mut lines, " Shift+Enter", "Insert parent", key_style, desc_style);
    add_binding(&mut lines, " Enter/e", "Edit text", key_style, desc_style);
    add_binding(&mut lines, " Del/Bksp", "Delete subtree", key_style, desc_style);
    add_binding(&mut lines, " Space", "Fold / unfold", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Navigation", header_style)));
    add_binding(
        &mut lines,
        " \u{2190}\u{2191}\u{2192}\u{2193}",
        "Parent / child / siblings",
        key_style,
        desc_style,
    );
    add_binding(&mut lines, " Esc", "Clear selection", key_style, desc_style);
    add_binding(&mut lines, " d", "Cycle direction", key_style, desc_style);
    add_binding(&mut lines, " Mouse drag", "Reparent node", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " Ctrl+Z", "Undo", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+Y", "Redo", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+C/V", "Copy / paste", key_style, desc_style);
    add_binding(&mut lines, " ?", "This help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
