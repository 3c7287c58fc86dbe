use serde::Serialize;

use crate::model::node::{Node, NodeStyle};
use crate::ops::layout::{Direction, Layout};
use crate::ops::tree::TreeIndex;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NodeJson {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub style: NodeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeJson>,
}

#[derive(Serialize)]
pub struct MapJson {
    pub name: String,
    pub nodes: usize,
    pub roots: Vec<NodeJson>,
}

#[derive(Serialize)]
pub struct LayoutJson<'a> {
    pub direction: Direction,
    #[serde(flatten)]
    pub layout: &'a Layout,
}

/// Result of a write command in --json mode
#[derive(Serialize)]
pub struct ChangeJson {
    pub action: &'static str,
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Nested JSON for `id` and everything below it
pub fn node_to_json(index: &TreeIndex<'_>, id: &str) -> Option<NodeJson> {
    let node = index.get(id)?;
    Some(NodeJson {
        id: node.id.clone(),
        content: node.content.clone(),
        parent: index.parent(id).map(String::from),
        collapsed: node.metadata.collapsed,
        color: node.metadata.color.clone(),
        icon: node.metadata.icon.clone(),
        style: node.metadata.style(),
        source: node.metadata.source_item_id.clone(),
        children: index
            .children(id)
            .iter()
            .filter_map(|child| node_to_json(index, child))
            .collect(),
    })
}

pub fn map_to_json(name: &str, nodes: &[Node]) -> MapJson {
    let index = TreeIndex::new(nodes);
    MapJson {
        name: name.to_string(),
        nodes: nodes.len(),
        roots: index
            .roots()
            .iter()
            .filter_map(|root| node_to_json(&index, root))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One outline line: `+` marks a collapsed node with hidden children
pub fn format_node_line(node: &Node, has_children: bool, show_id: bool) -> String {
    let marker = if node.is_collapsed() && has_children {
        '+'
    } else {
        '-'
    };
    let icon = node
        .metadata
        .icon
        .as_ref()
        .map(|i| format!("{} ", i))
        .unwrap_or_default();
    let color = node
        .metadata
        .color
        .as_ref()
        .map(|c| format!(" [{}]", c))
        .unwrap_or_default();
    let id = if show_id {
        format!("  ({})", node.id)
    } else {
        String::new()
    };
    format!("{} {}{}{}{}", marker, icon, node.content, color, id)
}

/// Indented outline of `id`'s subtree; collapsed nodes hide their children
pub fn format_outline(index: &TreeIndex<'_>, id: &str, indent: usize, show_id: bool) -> Vec<String> {
    let Some(node) = index.get(id) else {
        return Vec::new();
    };
    let mut lines = vec![format!(
        "{}{}",
        "  ".repeat(indent),
        format_node_line(node, index.has_children(id), show_id)
    )];
    if !node.is_collapsed() {
        for child in index.children(id) {
            lines.extend(format_outline(index, child, indent + 1, show_id));
        }
    }
    lines
}

/// Outline of every root, in stored order
pub fn format_map(nodes: &[Node], show_id: bool) -> Vec<String> {
    let index = TreeIndex::new(nodes);
    index
        .roots()
        .iter()
        .flat_map(|root| format_outline(&index, root, 0, show_id))
        .collect()
}

/// One line per positioned node: `x,y  content  (id)`
pub fn format_layout(layout: &Layout) -> Vec<String> {
    let mut lines: Vec<String> = layout
        .nodes
        .iter()
        .map(|n| format!("{:>7},{:<7} {}  ({})", n.x, n.y, n.content, n.id))
        .collect();
    if !layout.edges.is_empty() {
        lines.push(String::new());
        for edge in &layout.edges {
            lines.push(format!("{} -> {}", edge.source, edge.target));
        }
    }
    lines
}

pub fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| {
        format!(
            "unknown direction '{}' (expected: left-right, right-left, top-bottom, bottom-top)",
            s
        )
    })
}

pub fn parse_style(s: &str) -> Result<NodeStyle, String> {
    NodeStyle::parse(s)
        .ok_or_else(|| format!("unknown style '{}' (expected: dot, card, text)", s))
}
