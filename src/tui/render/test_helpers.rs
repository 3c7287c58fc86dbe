use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::flow::Flow;
use crate::flow::test_helpers::sample_nodes;
use crate::io::store::MemoryStore;
use crate::model::config::MapConfig;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

fn app_with(nodes: Vec<crate::model::node::Node>) -> App<MemoryStore> {
    let flow = Flow::new(MemoryStore::new(nodes), &MapConfig::default());
    App::new(
        flow,
        "Test",
        PathBuf::from("/tmp/mindmap-test"),
        Theme::default(),
    )
}

/// Root with two children, the first of which has a child of its own.
pub fn sample_app() -> App<MemoryStore> {
    app_with(sample_nodes())
}

/// A map with no nodes.
pub fn empty_app() -> App<MemoryStore> {
    app_with(Vec::new())
}
