use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::store::{MemoryStore, NodeStore, StoreError};
use crate::model::map::MapDocument;
use crate::model::node::{Node, NodePatch};

/// Default map file name looked up in the working directory
pub const DEFAULT_MAP_FILE: &str = "mindmap.json";

/// Error type for map file I/O
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("no map file at {0} (run `mm init` first)")]
    NotFound(PathBuf),
    #[error("map file already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve the map path: an explicit path wins, else `mindmap.json` in `cwd`.
pub fn resolve_map_path(explicit: Option<&str>, cwd: &Path) -> PathBuf {
    match explicit {
        Some(p) => cwd.join(p),
        None => cwd.join(DEFAULT_MAP_FILE),
    }
}

/// Read and parse a map file.
pub fn load_map(path: &Path) -> Result<MapDocument, MapError> {
    if !path.exists() {
        return Err(MapError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| MapError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| MapError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize a map document the way it is stored on disk
pub fn serialize_map(doc: &MapDocument) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}

/// Write a map file atomically.
pub fn save_map(path: &Path, doc: &MapDocument) -> Result<(), StoreError> {
    let text = serialize_map(doc)?;
    atomic_write(path, text.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Create a new, empty map file. Refuses to overwrite unless `force`.
pub fn init_map(path: &Path, name: &str, force: bool) -> Result<MapDocument, MapError> {
    if path.exists() && !force {
        return Err(MapError::AlreadyExists(path.to_path_buf()));
    }
    let doc = MapDocument::new(name);
    save_map(path, &doc)?;
    Ok(doc)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// A store backed by a map file. Every write updates memory first, then
/// rewrites the file; a failed file write leaves the memory change in place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    name: String,
    memory: MemoryStore,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self, MapError> {
        let doc = load_map(path)?;
        Ok(FileStore {
            path: path.to_path_buf(),
            name: doc.name,
            memory: MemoryStore::new(doc.nodes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> MapDocument {
        MapDocument {
            name: self.name.clone(),
            nodes: self.memory.nodes().to_vec(),
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let result = save_map(&self.path, &self.document());
        if let Err(e) = &result {
            tracing::warn!(path = %self.path.display(), error = %e, "map write failed; keeping in-memory state");
        }
        result
    }
}

impl NodeStore for FileStore {
    fn nodes(&self) -> &[Node] {
        self.memory.nodes()
    }

    fn add_node(&mut self, node: Node) -> Result<(), StoreError> {
        self.memory.add_node(node)?;
        self.flush()
    }

    fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), StoreError> {
        self.memory.update_node(id, patch)?;
        self.flush()
    }

    fn delete_node(&mut self, id: &str) -> Result<(), StoreError> {
        self.memory.delete_node(id)?;
        self.flush()
    }

    fn replace_all(&mut self, nodes: Vec<Node>) -> Result<(), StoreError> {
        self.memory.replace_all(nodes)?;
        self.flush()
    }
}
