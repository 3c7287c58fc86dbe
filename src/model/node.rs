use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Visual style of a node box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    Dot,
    #[default]
    Card,
    Text,
}

impl NodeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeStyle::Dot => "dot",
            NodeStyle::Card => "card",
            NodeStyle::Text => "text",
        }
    }

    pub fn parse(s: &str) -> Option<NodeStyle> {
        match s {
            "dot" => Some(NodeStyle::Dot),
            "card" => Some(NodeStyle::Card),
            "text" => Some(NodeStyle::Text),
            _ => None,
        }
    }
}

/// Presentation attributes attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    /// Hide this node's subtree from layout
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_style: Option<NodeStyle>,
    /// Weak reference to the external record this node stands for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_item_id: Option<String>,
    /// Keys this crate does not interpret, kept so a save does not drop them
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeMetadata {
    pub fn is_empty(&self) -> bool {
        *self == NodeMetadata::default()
    }

    /// Effective style (card when unset)
    pub fn style(&self) -> NodeStyle {
        self.node_style.unwrap_or_default()
    }
}

/// A single entry in the mindmap forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "NodeMetadata::is_empty")]
    pub metadata: NodeMetadata,
}

impl Node {
    pub fn new(id: impl Into<String>, content: impl Into<String>, parent_id: Option<String>) -> Self {
        Node {
            id: id.into(),
            content: content.into(),
            parent_id,
            metadata: NodeMetadata::default(),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.metadata.collapsed
    }
}

/// A partial update for `NodeStore::update_node`. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub content: Option<String>,
    /// `Some(None)` detaches the node into a root
    pub parent_id: Option<Option<String>>,
    pub metadata: Option<NodeMetadata>,
}

impl NodePatch {
    pub fn content(content: impl Into<String>) -> Self {
        NodePatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn parent(parent_id: Option<String>) -> Self {
        NodePatch {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }

    pub fn metadata(metadata: NodeMetadata) -> Self {
        NodePatch {
            metadata: Some(metadata),
            ..Default::default()
        }
    }

    /// Apply this patch to a node in place
    pub fn apply(self, node: &mut Node) {
        if let Some(content) = self.content {
            node.content = content;
        }
        if let Some(parent_id) = self.parent_id {
            node.parent_id = parent_id;
        }
        if let Some(metadata) = self.metadata {
            node.metadata = metadata;
        }
    }
}

/// Generate a fresh, collision-resistant node id
pub fn new_node_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
