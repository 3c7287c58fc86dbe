use serde::{Deserialize, Serialize};

use super::node::Node;

/// On-disk shape of a map file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl MapDocument {
    pub fn new(name: impl Into<String>) -> Self {
        MapDocument {
            name: name.into(),
            nodes: Vec::new(),
        }
    }
}
