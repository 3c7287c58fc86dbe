use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ops::layout::Direction;

const STATE_FILE: &str = ".mindmap-state.json";

/// Persisted TUI state (written to .mindmap-state.json beside the map)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Layout direction last used
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Selected node id
    #[serde(default)]
    pub selected: Option<String>,
}

/// Read the state file from `dir`; missing or malformed files yield None
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file to `dir`
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(STATE_FILE);
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
