use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ops::layout::Direction;

/// Configuration from mindmap.toml (every table is optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub nodes: NodesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Box size and spacing used by the layout engine, in layout units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_node_width")]
    pub node_width: f64,
    #[serde(default = "default_node_height")]
    pub node_height: f64,
    /// Gap between a node and its children along the growth axis
    #[serde(default = "default_level_gap")]
    pub level_gap: f64,
    /// Gap between adjacent sibling subtrees
    #[serde(default = "default_sibling_gap")]
    pub sibling_gap: f64,
    /// Gap between separate root trees
    #[serde(default = "default_root_gap")]
    pub root_gap: f64,
    #[serde(default)]
    pub direction: Direction,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: default_node_width(),
            node_height: default_node_height(),
            level_gap: default_level_gap(),
            sibling_gap: default_sibling_gap(),
            root_gap: default_root_gap(),
            direction: Direction::default(),
        }
    }
}

fn default_node_width() -> f64 {
    180.0
}

fn default_node_height() -> f64 {
    40.0
}

fn default_level_gap() -> f64 {
    80.0
}

fn default_sibling_gap() -> f64 {
    20.0
}

fn default_root_gap() -> f64 {
    60.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    50
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesConfig {
    /// Content given to freshly created nodes
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for NodesConfig {
    fn default() -> Self {
        NodesConfig {
            placeholder: default_placeholder(),
        }
    }
}

fn default_placeholder() -> String {
    "New node".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiConfig {
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Named node colors, e.g. `red = "#FF4444"`
    #[serde(default)]
    pub node_colors: HashMap<String, String>,
}
