use std::collections::{HashMap, HashSet};

use crate::model::node::{Node, new_node_id};
use crate::ops::tree::TreeIndex;

/// Session-local copy of a subtree, held for paste
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    nodes: Vec<Node>,
}

impl Clipboard {
    /// Copy `id` and all of its descendants. None when `id` is unknown.
    pub fn copy_subtree(nodes: &[Node], id: &str) -> Option<Clipboard> {
        let index = TreeIndex::new(nodes);
        let ids: HashSet<&str> = index.subtree(id).into_iter().collect();
        if ids.is_empty() {
            return None;
        }
        // Root first; the rest keep flat-list order so sibling order survives.
        // A reparent can leave a descendant ahead of its new ancestor.
        let (root, rest): (Vec<&Node>, Vec<&Node>) = nodes
            .iter()
            .filter(|n| ids.contains(n.id.as_str()))
            .partition(|n| n.id == id);
        let copied = root.into_iter().chain(rest).cloned().collect();
        Some(Clipboard { nodes: copied })
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Clipboard { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clone every node with a fresh id. Internal parent links follow the new
    /// ids; nodes whose parent is outside the clipboard attach to `target`.
    pub fn clone_with_fresh_ids(&self, target: Option<&str>) -> Vec<Node> {
        let mapping: HashMap<&str, String> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), new_node_id()))
            .collect();

        self.nodes
            .iter()
            .map(|n| {
                let parent_id = match n.parent_id.as_deref().and_then(|p| mapping.get(p)) {
                    Some(new_parent) => Some(new_parent.clone()),
                    None => target.map(String::from),
                };
                Node {
                    id: mapping[n.id.as_str()].clone(),
                    content: n.content.clone(),
                    parent_id,
                    metadata: n.metadata.clone(),
                }
            })
            .collect()
    }
}
