use std::collections::HashMap;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use unicode_segmentation::UnicodeSegmentation;

use crate::io::store::NodeStore;
use crate::model::node::NodeStyle;
use crate::ops::layout::{Layout, PositionedNode, Side};
use crate::tui::app::App;
use crate::util::unicode;

/// Layout units per terminal cell, on both axes
pub const UNITS_PER_CELL: f64 = 10.0;

/// A node box in canvas cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub col: i32,
    pub row: i32,
    pub width: i32,
    pub height: i32,
}

impl CellBox {
    pub fn right(&self) -> i32 {
        self.col + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.row + self.height
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.col && col < self.right() && row >= self.row && row < self.bottom()
    }

    fn mid_row(&self) -> i32 {
        self.row + (self.height - 1) / 2
    }

    fn mid_col(&self) -> i32 {
        self.col + (self.width - 1) / 2
    }

    /// Connector cell just outside the given face
    fn anchor(&self, side: Side) -> (i32, i32) {
        match side {
            Side::Left => (self.col - 1, self.mid_row()),
            Side::Right => (self.right(), self.mid_row()),
            Side::Top => (self.mid_col(), self.row - 1),
            Side::Bottom => (self.mid_col(), self.bottom()),
        }
    }
}

pub fn to_cells(units: f64) -> i32 {
    (units / UNITS_PER_CELL).round() as i32
}

pub fn cell_box(node: &PositionedNode) -> CellBox {
    CellBox {
        col: to_cells(node.x),
        row: to_cells(node.y),
        width: to_cells(node.width).max(3),
        height: to_cells(node.height).max(1),
    }
}

/// Smallest cell rectangle holding every node: (left, top, right, bottom)
pub fn content_bounds(layout: &Layout) -> Option<(i32, i32, i32, i32)> {
    layout.nodes.iter().map(cell_box).fold(None, |acc, b| {
        Some(match acc {
            None => (b.col, b.row, b.right(), b.bottom()),
            Some((l, t, r, btm)) => (l.min(b.col), t.min(b.row), r.max(b.right()), btm.max(b.bottom())),
        })
    })
}

/// Shift `viewport` just enough to show `b` inside a `width` x `height` window
pub fn scroll_into_view(viewport: (i32, i32), b: CellBox, width: i32, height: i32) -> (i32, i32) {
    let axis = |start: i32, lo: i32, hi: i32, span: i32| {
        if lo < start {
            lo - 1
        } else if hi > start + span {
            (hi - span + 1).min(lo - 1)
        } else {
            start
        }
    };
    (
        axis(viewport.0, b.col, b.right(), width),
        axis(viewport.1, b.row, b.bottom(), height),
    )
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const UP: u8 = 4;
const DOWN: u8 = 8;

/// Connector cells with the directions each one links to
#[derive(Debug, Default)]
struct Junctions {
    cells: HashMap<(i32, i32), u8>,
}

impl Junctions {
    fn horizontal(&mut self, row: i32, a: i32, b: i32) {
        let (lo, hi) = (a.min(b), a.max(b));
        for col in lo..=hi {
            let mut bits = 0;
            if col > lo {
                bits |= LEFT;
            }
            if col < hi {
                bits |= RIGHT;
            }
            if lo == hi {
                bits = LEFT | RIGHT;
            }
            *self.cells.entry((col, row)).or_default() |= bits;
        }
    }

    fn vertical(&mut self, col: i32, a: i32, b: i32) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        for row in lo..=hi {
            let mut bits = 0;
            if row > lo {
                bits |= UP;
            }
            if row < hi {
                bits |= DOWN;
            }
            *self.cells.entry((col, row)).or_default() |= bits;
        }
    }

    /// Elbow connector between two anchors: out along the growth axis,
    /// across at the midpoint, then in.
    fn connect(&mut self, from: (i32, i32), to: (i32, i32), horizontal: bool) {
        let (sx, sy) = from;
        let (tx, ty) = to;
        if horizontal {
            let mx = (sx + tx) / 2;
            self.horizontal(sy, sx, mx);
            self.vertical(mx, sy, ty);
            self.horizontal(ty, mx, tx);
        } else {
            let my = (sy + ty) / 2;
            self.vertical(sx, sy, my);
            self.horizontal(my, sx, tx);
            self.vertical(tx, my, ty);
        }
    }
}

fn junction_glyph(bits: u8) -> &'static str {
    match bits {
        b if b == LEFT | RIGHT | UP | DOWN => "┼",
        b if b == LEFT | RIGHT | DOWN => "┬",
        b if b == LEFT | RIGHT | UP => "┴",
        b if b == UP | DOWN | RIGHT => "├",
        b if b == UP | DOWN | LEFT => "┤",
        b if b == RIGHT | DOWN => "┌",
        b if b == LEFT | DOWN => "┐",
        b if b == RIGHT | UP => "└",
        b if b == LEFT | UP => "┘",
        b if b & (UP | DOWN) != 0 && b & (LEFT | RIGHT) == 0 => "│",
        _ => "─",
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Maps canvas cells to screen cells and clips to the canvas area
struct Painter<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    origin: (i32, i32),
}

impl Painter<'_> {
    fn screen(&self, col: i32, row: i32) -> Option<Position> {
        let x = i32::from(self.area.x) + col - self.origin.0;
        let y = i32::from(self.area.y) + row - self.origin.1;
        let inside = x >= i32::from(self.area.x)
            && x < i32::from(self.area.right())
            && y >= i32::from(self.area.y)
            && y < i32::from(self.area.bottom());
        if !inside {
            return None;
        }
        Some(Position::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    fn put(&mut self, col: i32, row: i32, symbol: &str, style: Style) {
        if let Some(pos) = self.screen(col, row)
            && let Some(cell) = self.buf.cell_mut(pos)
        {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    /// Write `text` from (`col`, `row`) without passing `max_col`
    fn put_str(&mut self, col: i32, row: i32, text: &str, max_col: i32, style: Style) {
        let mut at = col;
        for g in text.graphemes(true) {
            let w = unicode::display_width(g) as i32;
            if w == 0 {
                continue;
            }
            if at + w > max_col {
                break;
            }
            self.put(at, row, g, style);
            for extra in 1..w {
                self.put(at + extra, row, "", style);
            }
            at += w;
        }
    }

    fn frame(&mut self, b: CellBox, style: Style) {
        let (l, t, r, btm) = (b.col, b.row, b.right() - 1, b.bottom() - 1);
        for col in l + 1..r {
            self.put(col, t, "─", style);
            self.put(col, btm, "─", style);
        }
        for row in t + 1..btm {
            self.put(l, row, "│", style);
            self.put(r, row, "│", style);
        }
        self.put(l, t, "╭", style);
        self.put(r, t, "╮", style);
        self.put(l, btm, "╰", style);
        self.put(r, btm, "╯", style);
    }

    fn fill(&mut self, b: CellBox, style: Style) {
        for row in b.row..b.bottom() {
            for col in b.col..b.right() {
                self.put(col, row, " ", style);
            }
        }
    }
}

/// Render the mindmap canvas and record where it went
pub fn render_canvas<S: NodeStore>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    app.canvas_area = area;
    let theme = app.theme.clone();
    let base = Style::default().bg(theme.background);
    let layout = app.flow.layout();

    let Some((left, top, _, _)) = content_bounds(layout) else {
        let hint = "Empty map: press Tab to add a root";
        let x = area.x + area.width.saturating_sub(hint.len() as u16) / 2;
        let y = area.y + area.height / 2;
        let line_area = Rect::new(x, y, area.width.min(hint.len() as u16), 1).intersection(area);
        frame
            .buffer_mut()
            .set_string(line_area.x, line_area.y, hint, base.fg(theme.dim));
        return;
    };

    // Viewport: default to the content's top-left, then chase the selection
    let mut viewport = app.viewport.unwrap_or((left - 1, top - 1));
    if let Some(selected) = app.flow.selected().and_then(|id| layout.node(id)) {
        viewport = scroll_into_view(
            viewport,
            cell_box(selected),
            i32::from(area.width),
            i32::from(area.height),
        );
    }
    app.viewport = Some(viewport);

    let mut painter = Painter {
        buf: frame.buffer_mut(),
        area,
        origin: viewport,
    };

    // Connectors first; boxes paint over them
    let horizontal = app.flow.direction().is_horizontal();
    let mut junctions = Junctions::default();
    for edge in &layout.edges {
        let (Some(source), Some(target)) = (layout.node(&edge.source), layout.node(&edge.target))
        else {
            continue;
        };
        junctions.connect(
            cell_box(source).anchor(source.source_position),
            cell_box(target).anchor(target.target_position),
            horizontal,
        );
    }
    let edge_style = base.fg(theme.edge);
    for (&(col, row), &bits) in &junctions.cells {
        painter.put(col, row, junction_glyph(bits), edge_style);
    }

    let selected = app.flow.selected();
    let mut cursor = None;
    for node in &layout.nodes {
        let b = cell_box(node);
        let is_selected = selected == Some(node.id.as_str());
        let accent = node
            .metadata
            .color
            .as_deref()
            .and_then(|c| theme.node_color(c));

        let mut text_style = base.fg(if is_selected {
            theme.text_bright
        } else {
            theme.text
        });
        if is_selected {
            text_style = text_style.bg(theme.selection_bg).add_modifier(Modifier::BOLD);
        }
        let border_style = if is_selected {
            text_style.fg(theme.selection_border)
        } else {
            base.fg(accent.unwrap_or(theme.dim))
        };

        let style = node.metadata.style();
        painter.fill(b, if is_selected { text_style } else { base });
        if style == NodeStyle::Card {
            painter.frame(b, border_style);
        }

        // Label: the open editor's buffer, else icon + content
        let editing = app.editor.as_ref().filter(|e| e.node_id == node.id);
        let mut label = match editing {
            Some(buf) => buf.text.clone(),
            None => match &node.metadata.icon {
                Some(icon) => format!("{} {}", icon, node.content),
                None => node.content.clone(),
            },
        };
        if style == NodeStyle::Dot {
            label = format!("● {}", label);
        }
        let inner_w = (b.width - 2).max(1);
        let inner_h = (b.height - 2).max(1);
        let label_style = match (accent, style) {
            (Some(color), NodeStyle::Text | NodeStyle::Dot) if !is_selected => text_style.fg(color),
            _ => text_style,
        };
        if let Some(buf) = editing {
            let shown = unicode::fit_to_width(&label, inner_w as usize);
            painter.put_str(b.col + 1, b.row + 1, &shown, b.col + 1 + inner_w, label_style);
            let prefix = if style == NodeStyle::Dot { 2 } else { 0 };
            let col = b.col + 1 + (prefix + buf.cursor_col() as i32).min(inner_w - 1);
            cursor = painter.screen(col, b.row + 1);
        } else {
            for (i, line) in unicode::wrap_label(&label, inner_w as usize, inner_h as usize)
                .iter()
                .enumerate()
            {
                painter.put_str(b.col + 1, b.row + 1 + i as i32, line, b.col + 1 + inner_w, label_style);
            }
        }

        // Collapsed marker in the bottom-right corner
        if node.metadata.collapsed && node.has_children {
            painter.put(b.right() - 2, b.bottom() - 1, "+", border_style.add_modifier(Modifier::BOLD));
        }
    }

    // Drag ghost
    if let Some(drag) = &app.drag
        && let Some(node) = layout.node(&drag.node_id)
    {
        let mut ghost = cell_box(node);
        ghost.col = drag.at.0 - drag.grab.0;
        ghost.row = drag.at.1 - drag.grab.1;
        painter.frame(ghost, base.fg(theme.highlight));
    }

    if let Some(pos) = cursor {
        frame.set_cursor_position(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn draw(app: &mut App<crate::io::store::MemoryStore>, w: u16, h: u16) -> String {
        render_to_string(w, h, |frame, area| render_canvas(frame, app, area))
    }

    #[test]
    fn cell_box_scales_layout_units() {
        let mut app = sample_app();
        let root = app.flow.layout().node("root").unwrap().clone();
        assert_eq!(
            cell_box(&root),
            CellBox {
                col: 0,
                row: 3,
                width: 18,
                height: 4
            }
        );
        draw(&mut app, 80, 12);
        assert_eq!(app.viewport, Some((-1, -1)));
    }

    #[test]
    fn draws_boxes_and_shared_trunk() {
        let mut app = sample_app();
        let out = draw(&mut app, 80, 12);
        let lines: Vec<&str> = out.lines().collect();
        // One cell of margin: canvas (col, row) lands on screen (col + 1, row + 1)
        let pad = |n: usize| " ".repeat(n);
        assert_eq!(
            lines[1],
            format!("{}╭────────────────╮{}╭────────────────╮", pad(27), pad(8))
        );
        assert_eq!(
            lines[2],
            format!(
                "{}┌────│Child 1         │────────│Grandchild      │",
                pad(22)
            )
        );
        assert_eq!(lines[5], " │Root            │───┤");
        assert_eq!(lines[8], format!("{}└────│Child 2         │", pad(22)));
    }

    #[test]
    fn selection_scrolls_into_view() {
        let mut app = sample_app();
        app.flow.select("grandchild");
        draw(&mut app, 40, 12);
        let (left, _) = app.viewport.unwrap();
        // grandchild spans cols 52..70; the window is 40 wide
        assert_eq!(left, 31);
    }

    #[test]
    fn collapsed_marker_and_hidden_children() {
        let mut app = sample_app();
        app.flow.toggle_collapse("child1").unwrap();
        let out = draw(&mut app, 80, 12);
        assert!(!out.contains("Grandchild"));
        assert!(out.contains("╰───────────────+╯"));
    }

    #[test]
    fn empty_map_shows_hint() {
        let mut app = empty_app();
        let out = draw(&mut app, 60, 6);
        assert!(out.contains("Empty map: press Tab to add a root"));
    }

    #[test]
    fn editor_text_replaces_label() {
        let mut app = sample_app();
        app.flow.select("child2");
        app.begin_edit();
        app.editor.as_mut().unwrap().insert('!');
        let out = draw(&mut app, 80, 12);
        assert!(out.contains("│Child 2!        │"));
    }

    #[test]
    fn scroll_keeps_visible_box() {
        let b = CellBox {
            col: 5,
            row: 5,
            width: 4,
            height: 2,
        };
        assert_eq!(scroll_into_view((0, 0), b, 20, 20), (0, 0));
        assert_eq!(scroll_into_view((10, 10), b, 20, 20), (4, 4));
        assert_eq!(scroll_into_view((-20, -20), b, 10, 10), (0, -2));
    }

    #[test]
    fn glyphs_merge() {
        assert_eq!(junction_glyph(LEFT | UP | DOWN), "┤");
        assert_eq!(junction_glyph(RIGHT | DOWN), "┌");
        assert_eq!(junction_glyph(UP | DOWN), "│");
        assert_eq!(junction_glyph(LEFT), "─");
    }
}
