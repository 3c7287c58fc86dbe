use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::flow::DropOutcome;
use crate::io::store::NodeStore;
use crate::tui::app::{App, Drag};
use crate::tui::render::canvas::{UNITS_PER_CELL, cell_box};

/// Canvas cell under a screen position, if the position is on the canvas
fn canvas_cell<S: NodeStore>(app: &App<S>, column: u16, row: u16) -> Option<(i32, i32)> {
    let area = app.canvas_area;
    let on_canvas =
        column >= area.x && column < area.right() && row >= area.y && row < area.bottom();
    if !on_canvas {
        return None;
    }
    let (left, top) = app.viewport?;
    Some((
        i32::from(column - area.x) + left,
        i32::from(row - area.y) + top,
    ))
}

/// Topmost node box covering a canvas cell
fn node_at<S: NodeStore>(app: &App<S>, cell: (i32, i32)) -> Option<(String, (i32, i32))> {
    app.flow.layout().nodes.iter().rev().find_map(|node| {
        let b = cell_box(node);
        b.contains(cell.0, cell.1)
            .then(|| (node.id.clone(), (cell.0 - b.col, cell.1 - b.row)))
    })
}

/// Click selects, drag onto another node reparents
pub fn handle_mouse<S: NodeStore>(app: &mut App<S>, mouse: MouseEvent) {
    if app.editor.is_some() || app.show_help {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(cell) = canvas_cell(app, mouse.column, mouse.row) else {
                return;
            };
            match node_at(app, cell) {
                Some((id, grab)) => {
                    app.flow.select(&id);
                    app.drag = Some(Drag {
                        node_id: id,
                        grab,
                        at: cell,
                    });
                }
                None => app.flow.clear_selection(),
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(cell) = canvas_cell(app, mouse.column, mouse.row) else {
                return;
            };
            if let Some(drag) = app.drag.as_mut() {
                drag.at = cell;
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(drag) = app.drag.take() else {
                return;
            };
            if let Some(cell) = canvas_cell(app, mouse.column, mouse.row) {
                finish_drag(app, Drag { at: cell, ..drag });
            }
        }
        MouseEventKind::ScrollUp => scroll(app, 0, -2),
        MouseEventKind::ScrollDown => scroll(app, 0, 2),
        MouseEventKind::ScrollLeft => scroll(app, -4, 0),
        MouseEventKind::ScrollRight => scroll(app, 4, 0),
        _ => {}
    }
}

fn finish_drag<S: NodeStore>(app: &mut App<S>, drag: Drag) {
    let col = drag.at.0 - drag.grab.0;
    let row = drag.at.1 - drag.grab.1;
    let Some(start) = app.flow.layout().node(&drag.node_id).map(cell_box) else {
        return;
    };
    // A click without movement is just a selection
    if (col, row) == (start.col, start.row) {
        return;
    }
    let x = f64::from(col) * UNITS_PER_CELL;
    let y = f64::from(row) * UNITS_PER_CELL;
    match app.flow.drop_node(&drag.node_id, x, y) {
        Ok(DropOutcome::Reparented { parent }) => {
            let label = app
                .flow
                .node(&parent)
                .map_or(parent.clone(), |n| n.content.clone());
            app.set_status(format!("moved under {}", label));
        }
        Ok(DropOutcome::SnappedBack { .. }) => app.set_status("no drop target"),
        Ok(DropOutcome::Ignored) => {}
        Err(e) => {
            tracing::warn!(error = %e, "save failed");
            app.set_error(format!("save failed: {}", e));
        }
    }
}

fn scroll<S: NodeStore>(app: &mut App<S>, dx: i32, dy: i32) {
    if let Some((left, top)) = app.viewport {
        app.viewport = Some((left + dx, top + dy));
    }
}
