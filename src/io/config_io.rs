use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::MapConfig;

pub const CONFIG_FILE: &str = "mindmap.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Directory holding the map file (and its config / state files)
pub fn map_dir(map_path: &Path) -> &Path {
    match map_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Read `mindmap.toml` from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<MapConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(MapConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

pub fn parse_config(text: &str) -> Result<MapConfig, toml::de::Error> {
    toml::from_str(text)
}
