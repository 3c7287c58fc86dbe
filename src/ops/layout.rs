use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::config::LayoutConfig;
use crate::model::node::{Node, NodeMetadata};
use crate::ops::tree::TreeIndex;

/// Growth direction of the mindmap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    LeftRight,
    RightLeft,
    TopBottom,
    BottomTop,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::LeftRight,
        Direction::TopBottom,
        Direction::RightLeft,
        Direction::BottomTop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LeftRight => "left-right",
            Direction::RightLeft => "right-left",
            Direction::TopBottom => "top-bottom",
            Direction::BottomTop => "bottom-top",
        }
    }

    /// Accepts the full name or the two-letter form (`lr`, `rl`, `tb`, `bt`)
    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_ascii_lowercase().as_str() {
            "left-right" | "lr" => Some(Direction::LeftRight),
            "right-left" | "rl" => Some(Direction::RightLeft),
            "top-bottom" | "tb" => Some(Direction::TopBottom),
            "bottom-top" | "bt" => Some(Direction::BottomTop),
            _ => None,
        }
    }

    /// Next direction in the LR → TB → RL → BT cycle
    pub fn next(self) -> Direction {
        let idx = Direction::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Direction::ALL[(idx + 1) % Direction::ALL.len()]
    }

    /// True when depth grows along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Connector faces as (target, source)
    pub fn handles(self) -> (Side, Side) {
        match self {
            Direction::LeftRight => (Side::Left, Side::Right),
            Direction::RightLeft => (Side::Right, Side::Left),
            Direction::TopBottom => (Side::Top, Side::Bottom),
            Direction::BottomTop => (Side::Bottom, Side::Top),
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::LeftRight | Direction::TopBottom => 1.0,
            Direction::RightLeft | Direction::BottomTop => -1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Face of a node box where a connector attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// A node with a computed top-left position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub target_position: Side,
    pub source_position: Side,
    /// Whether the node has children in the full tree (hidden ones included)
    pub has_children: bool,
    #[serde(skip_serializing_if = "NodeMetadata::is_empty")]
    pub metadata: NodeMetadata,
}

impl PositionedNode {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// A parent → child connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Axis-aligned box in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Strict overlap; boxes that only touch do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Ids hidden because some ancestor is collapsed
pub fn hidden_ids<'a>(index: &TreeIndex<'a>, nodes: &'a [Node]) -> HashSet<&'a str> {
    let mut hidden = HashSet::new();
    for node in nodes.iter().filter(|n| n.is_collapsed()) {
        if hidden.contains(node.id.as_str()) {
            continue;
        }
        hidden.extend(index.descendants(&node.id));
    }
    hidden
}

/// Compute positions and edges for `nodes` growing in `direction`.
pub fn layout(nodes: &[Node], direction: Direction, config: &LayoutConfig) -> Layout {
    if nodes.is_empty() {
        return Layout::default();
    }

    let full = TreeIndex::new(nodes);
    let hidden = hidden_ids(&full, nodes);
    let visible: Vec<Node> = nodes
        .iter()
        .filter(|n| !hidden.contains(n.id.as_str()))
        .cloned()
        .collect();
    let index = TreeIndex::new(&visible);

    let mut engine = Engine::new(&index, &full, direction, config);
    let mut cursor = 0.0;
    for &root in index.roots() {
        let extent = engine.measure(root);
        engine.place(root, 0, cursor);
        cursor += extent + config.root_gap;
    }

    if engine.out.nodes.len() < index.len() {
        tracing::warn!(
            placed = engine.out.nodes.len(),
            visible = index.len(),
            "some nodes are unreachable from any root (parent cycle?) and were not laid out"
        );
    }
    engine.out
}

struct Engine<'i, 'a, 'f> {
    index: &'i TreeIndex<'a>,
    full: &'i TreeIndex<'f>,
    direction: Direction,
    config: &'i LayoutConfig,
    /// Node size along the growth axis
    along: f64,
    /// Node size across the growth axis
    across: f64,
    /// Memoized subtree extents
    extents: HashMap<&'a str, f64>,
    visited: HashSet<&'a str>,
    out: Layout,
}

impl<'i, 'a, 'f> Engine<'i, 'a, 'f> {
    fn new(
        index: &'i TreeIndex<'a>,
        full: &'i TreeIndex<'f>,
        direction: Direction,
        config: &'i LayoutConfig,
    ) -> Self {
        let (along, across) = if direction.is_horizontal() {
            (config.node_width, config.node_height)
        } else {
            (config.node_height, config.node_width)
        };
        Engine {
            index,
            full,
            direction,
            config,
            along,
            across,
            extents: HashMap::new(),
            visited: HashSet::new(),
            out: Layout::default(),
        }
    }

    /// Size of the subtree rooted at `id` across the growth axis.
    /// Only called on nodes reachable from a root, which never form a cycle.
    fn measure(&mut self, id: &'a str) -> f64 {
        if let Some(extent) = self.extents.get(id) {
            return *extent;
        }
        let index = self.index;
        let children = index.children(id);
        let extent = if children.is_empty() {
            self.across
        } else {
            let mut sum = 0.0;
            for &child in children {
                sum += self.measure(child);
            }
            sum + (children.len() - 1) as f64 * self.config.sibling_gap
        };
        self.extents.insert(id, extent);
        extent
    }

    /// Place `id` at `depth`, with its subtree starting at `start` on the cross axis
    fn place(&mut self, id: &'a str, depth: usize, start: f64) {
        if !self.visited.insert(id) {
            return;
        }
        let extent = self.measure(id);
        let index = self.index;

        let primary = depth as f64 * (self.along + self.config.level_gap);
        let secondary = start + extent / 2.0 - self.across / 2.0;
        self.push_node(id, primary, secondary);

        let mut cursor = start;
        for &child in index.children(id) {
            let child_extent = self.measure(child);
            self.place(child, depth + 1, cursor);
            self.out.edges.push(Edge {
                id: format!("{}-{}", id, child),
                source: id.to_string(),
                target: child.to_string(),
            });
            cursor += child_extent + self.config.sibling_gap;
        }
    }

    fn push_node(&mut self, id: &str, primary: f64, secondary: f64) {
        let Some(node) = self.index.get(id) else {
            return;
        };
        // Mirrored directions grow toward negative coordinates; the box keeps its top-left anchor.
        let primary = if self.direction.sign() < 0.0 {
            -primary - self.along
        } else {
            primary
        };
        let (x, y) = if self.direction.is_horizontal() {
            (primary, secondary)
        } else {
            (secondary, primary)
        };
        let (target_position, source_position) = self.direction.handles();
        self.out.nodes.push(PositionedNode {
            id: node.id.clone(),
            content: node.content.clone(),
            x,
            y,
            width: self.config.node_width,
            height: self.config.node_height,
            target_position,
            source_position,
            has_children: self.full.has_children(id),
            metadata: node.metadata.clone(),
        });
    }
}
