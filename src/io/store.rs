use std::path::PathBuf;

use crate::model::node::{Node, NodePatch};

/// Error type for store writes
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize map: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Backing collection for one map's nodes.
///
/// Implementations must apply each write to their in-memory node list before
/// attempting any durable write, and must not roll the in-memory change back
/// if the durable write fails.
pub trait NodeStore {
    fn nodes(&self) -> &[Node];

    fn add_node(&mut self, node: Node) -> Result<(), StoreError>;

    /// Unknown ids are ignored
    fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), StoreError>;

    /// Unknown ids are ignored
    fn delete_node(&mut self, id: &str) -> Result<(), StoreError>;

    fn replace_all(&mut self, nodes: Vec<Node>) -> Result<(), StoreError>;
}

/// Plain in-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    nodes: Vec<Node>,
}

impl MemoryStore {
    pub fn new(nodes: Vec<Node>) -> Self {
        MemoryStore { nodes }
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl NodeStore for MemoryStore {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn add_node(&mut self, node: Node) -> Result<(), StoreError> {
        self.nodes.push(node);
        Ok(())
    }

    fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), StoreError> {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            patch.apply(node);
        }
        Ok(())
    }

    fn delete_node(&mut self, id: &str) -> Result<(), StoreError> {
        self.nodes.retain(|n| n.id != id);
        Ok(())
    }

    fn replace_all(&mut self, nodes: Vec<Node>) -> Result<(), StoreError> {
        self.nodes = nodes;
        Ok(())
    }
}
