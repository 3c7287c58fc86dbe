use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::model::node::Node;

/// Parent → ordered children adjacency for one pass over a flat node list.
///
/// Children keep the order in which they appear in the flat list. Nodes whose
/// `parent_id` is absent or does not resolve are roots.
#[derive(Debug, Clone)]
pub struct TreeIndex<'a> {
    nodes: IndexMap<&'a str, &'a Node>,
    children: IndexMap<&'a str, Vec<&'a str>>,
    roots: Vec<&'a str>,
}

impl<'a> TreeIndex<'a> {
    pub fn new(list: &'a [Node]) -> Self {
        let nodes: IndexMap<&str, &Node> = list.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut children: IndexMap<&str, Vec<&str>> = IndexMap::new();
        let mut roots = Vec::new();
        for node in list {
            match node.parent_id.as_deref() {
                Some(parent) if parent != node.id && nodes.contains_key(parent) => {
                    children.entry(parent).or_default().push(node.id.as_str());
                }
                _ => roots.push(node.id.as_str()),
            }
        }
        TreeIndex {
            nodes,
            children,
            roots,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[&'a str] {
        &self.roots
    }

    pub fn children(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children(id).is_empty()
    }

    /// Resolved parent id (None for roots and dangling references)
    pub fn parent(&self, id: &str) -> Option<&'a str> {
        let node = self.get(id)?;
        let parent = node.parent_id.as_deref()?;
        self.nodes
            .get_key_value(parent)
            .filter(|(key, _)| **key != id)
            .map(|(key, _)| *key)
    }

    /// Siblings of `id` including itself, in order (the root list for roots)
    pub fn siblings(&self, id: &str) -> &[&'a str] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    /// All transitive descendants of `id`, breadth-first, excluding `id`.
    pub fn descendants(&self, id: &str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(id);
        let mut queue: VecDeque<&str> = self.children(id).iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            queue.extend(self.children(next).iter().copied());
        }
        out
    }

    /// `id` followed by all its descendants
    pub fn subtree(&self, id: &str) -> Vec<&'a str> {
        let Some((key, _)) = self.nodes.get_key_value(id) else {
            return Vec::new();
        };
        let mut out = vec![*key];
        out.extend(self.descendants(id));
        out
    }

    /// True when `candidate` sits somewhere below `ancestor`
    pub fn is_descendant(&self, ancestor: &str, candidate: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = self.parent(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.parent(id);
        }
        false
    }
}
