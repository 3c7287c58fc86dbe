use std::collections::HashSet;

use crate::io::store::{NodeStore, StoreError};
use crate::model::node::{Node, NodeMetadata, NodePatch, NodeStyle, new_node_id};
use crate::ops::clipboard::Clipboard;
use crate::ops::tree::TreeIndex;

/// Error type for mindmap edit actions
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("node not found: {0}")]
    NotFound(String),
    #[error("cannot move {node} under {parent}: it would become its own descendant")]
    WouldCycle { node: String, parent: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound(_))
    }
}

/// Result of binding an external record into the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Created(String),
    /// A node already carried this source id; nothing was written
    Existing(String),
}

impl Imported {
    pub fn id(&self) -> &str {
        match self {
            Imported::Created(id) | Imported::Existing(id) => id,
        }
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Add a child under `parent_id`, or a new root when `parent_id` is None.
/// Returns the new node's id.
pub fn add_child<S: NodeStore + ?Sized>(
    store: &mut S,
    parent_id: Option<&str>,
    content: &str,
) -> Result<String, ActionError> {
    if let Some(parent) = parent_id {
        require(store.nodes(), parent)?;
    }
    let node = Node::new(new_node_id(), content, parent_id.map(String::from));
    let id = node.id.clone();
    store.add_node(node)?;
    tracing::debug!(%id, parent = ?parent_id, "added child");
    Ok(id)
}

/// Add a node next to `node_id` (same parent).
pub fn add_sibling<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    content: &str,
) -> Result<String, ActionError> {
    let parent_id = resolved_parent(store.nodes(), node_id)?;
    let node = Node::new(new_node_id(), content, parent_id);
    let id = node.id.clone();
    store.add_node(node)?;
    tracing::debug!(%id, sibling_of = node_id, "added sibling");
    Ok(id)
}

/// Insert a new node directly above `node_id`. The new node takes
/// `node_id`'s place under its old parent; former siblings are untouched.
pub fn add_parent<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    content: &str,
) -> Result<String, ActionError> {
    let parent_id = resolved_parent(store.nodes(), node_id)?;
    let node = Node::new(new_node_id(), content, parent_id);
    let id = node.id.clone();
    store.add_node(node)?;
    store.update_node(node_id, NodePatch::parent(Some(id.clone())))?;
    tracing::debug!(%id, child = node_id, "inserted parent");
    Ok(id)
}

/// Bind an external record as a new root, unless some node already carries
/// `source_item_id`.
pub fn import_external<S: NodeStore + ?Sized>(
    store: &mut S,
    source_item_id: &str,
    content: &str,
) -> Result<Imported, ActionError> {
    if let Some(existing) = store
        .nodes()
        .iter()
        .find(|n| n.metadata.source_item_id.as_deref() == Some(source_item_id))
    {
        return Ok(Imported::Existing(existing.id.clone()));
    }
    let mut node = Node::new(new_node_id(), content, None);
    node.metadata.source_item_id = Some(source_item_id.to_string());
    let id = node.id.clone();
    store.add_node(node)?;
    tracing::debug!(%id, source_item_id, "imported external record");
    Ok(Imported::Created(id))
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// Replace a node's content. Callers reject blank text before calling.
pub fn edit_content<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    content: &str,
) -> Result<(), ActionError> {
    require(store.nodes(), node_id)?;
    store.update_node(node_id, NodePatch::content(content))?;
    Ok(())
}

/// Flip the collapsed flag. The flag is stored even on leaves.
/// Returns the new value.
pub fn toggle_collapse<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
) -> Result<bool, ActionError> {
    let collapsed = update_metadata(store, node_id, |m| m.collapsed = !m.collapsed)?.collapsed;
    Ok(collapsed)
}

pub fn set_color<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    color: Option<String>,
) -> Result<(), ActionError> {
    update_metadata(store, node_id, |m| m.color = color)?;
    Ok(())
}

pub fn set_icon<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    icon: Option<String>,
) -> Result<(), ActionError> {
    update_metadata(store, node_id, |m| m.icon = icon)?;
    Ok(())
}

pub fn set_style<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    style: NodeStyle,
) -> Result<(), ActionError> {
    update_metadata(store, node_id, |m| m.node_style = Some(style))?;
    Ok(())
}

/// Move `node_id` under `new_parent` (or make it a root).
/// Rejects moves onto the node itself or any of its descendants.
pub fn reparent<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    new_parent: Option<&str>,
) -> Result<(), ActionError> {
    {
        let index = TreeIndex::new(store.nodes());
        if !index.contains(node_id) {
            return Err(ActionError::NotFound(node_id.to_string()));
        }
        if let Some(parent) = new_parent {
            if !index.contains(parent) {
                return Err(ActionError::NotFound(parent.to_string()));
            }
            if parent == node_id || index.is_descendant(node_id, parent) {
                return Err(ActionError::WouldCycle {
                    node: node_id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }
    store.update_node(node_id, NodePatch::parent(new_parent.map(String::from)))?;
    tracing::debug!(node = node_id, parent = ?new_parent, "reparented");
    Ok(())
}

/// Swap in a whole node collection (history restore).
pub fn replace_all<S: NodeStore + ?Sized>(
    store: &mut S,
    nodes: Vec<Node>,
) -> Result<(), ActionError> {
    store.replace_all(nodes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Delete / paste
// ---------------------------------------------------------------------------

/// Remove `node_id` and every descendant. Returns the removed ids,
/// `node_id` first, then descendants breadth-first.
pub fn delete_subtree<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
) -> Result<Vec<String>, ActionError> {
    let removed: Vec<String> = TreeIndex::new(store.nodes())
        .subtree(node_id)
        .into_iter()
        .map(String::from)
        .collect();
    if removed.is_empty() {
        return Err(ActionError::NotFound(node_id.to_string()));
    }

    if removed.len() == 1 {
        store.delete_node(node_id)?;
    } else {
        let doomed: HashSet<&str> = removed.iter().map(|s| s.as_str()).collect();
        let kept: Vec<Node> = store
            .nodes()
            .iter()
            .filter(|n| !doomed.contains(n.id.as_str()))
            .cloned()
            .collect();
        store.replace_all(kept)?;
    }
    tracing::debug!(node = node_id, count = removed.len(), "deleted subtree");
    Ok(removed)
}

/// Paste a clone of the clipboard under `target` (or as new roots).
/// Returns the new ids with the pasted subtree roots first, then the rest in
/// clipboard order.
pub fn paste<S: NodeStore + ?Sized>(
    store: &mut S,
    clipboard: &Clipboard,
    target: Option<&str>,
) -> Result<Vec<String>, ActionError> {
    if clipboard.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(target) = target {
        require(store.nodes(), target)?;
    }
    let clones = clipboard.clone_with_fresh_ids(target);
    // Only clipboard roots end up attached to `target`; inner links use fresh ids
    let (roots, inner): (Vec<&Node>, Vec<&Node>) = clones
        .iter()
        .partition(|n| n.parent_id.as_deref() == target);
    let ids: Vec<String> = roots.iter().chain(&inner).map(|n| n.id.clone()).collect();

    let mut combined = store.nodes().to_vec();
    combined.extend(clones);
    store.replace_all(combined)?;
    tracing::debug!(count = ids.len(), target = ?target, "pasted subtree");
    Ok(ids)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require<'a>(nodes: &'a [Node], node_id: &str) -> Result<&'a Node, ActionError> {
    nodes
        .iter()
        .find(|n| n.id == node_id)
        .ok_or_else(|| ActionError::NotFound(node_id.to_string()))
}

/// Stored parent of `node_id`, or NotFound
fn resolved_parent(nodes: &[Node], node_id: &str) -> Result<Option<String>, ActionError> {
    Ok(require(nodes, node_id)?.parent_id.clone())
}

fn update_metadata<S: NodeStore + ?Sized>(
    store: &mut S,
    node_id: &str,
    f: impl FnOnce(&mut NodeMetadata),
) -> Result<NodeMetadata, ActionError> {
    let mut metadata = require(store.nodes(), node_id)?.metadata.clone();
    f(&mut metadata);
    store.update_node(node_id, NodePatch::metadata(metadata.clone()))?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn sample_store() -> MemoryStore {
        MemoryStore::new(vec![
            Node::new("root", "Root", None),
            Node::new("child1", "Child 1", Some("root".into())),
            Node::new("grandchild", "Grandchild", Some("child1".into())),
            Node::new("child2", "Child 2", Some("root".into())),
        ])
    }

    fn ids(store: &MemoryStore) -> Vec<&str> {
        store.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    fn get<'a>(store: &'a MemoryStore, id: &str) -> &'a Node {
        store.nodes().iter().find(|n| n.id == id).unwrap()
    }

    /// Store that counts writes, to prove no-ops write nothing
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
    }

    impl NodeStore for CountingStore {
        fn nodes(&self) -> &[Node] {
            self.inner.nodes()
        }
        fn add_node(&mut self, node: Node) -> Result<(), StoreError> {
            self.writes += 1;
            self.inner.add_node(node)
        }
        fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), StoreError> {
            self.writes += 1;
            self.inner.update_node(id, patch)
        }
        fn delete_node(&mut self, id: &str) -> Result<(), StoreError> {
            self.writes += 1;
            self.inner.delete_node(id)
        }
        fn replace_all(&mut self, nodes: Vec<Node>) -> Result<(), StoreError> {
            self.writes += 1;
            self.inner.replace_all(nodes)
        }
    }

    #[test]
    fn add_child_under_parent_and_as_root() {
        let mut store = sample_store();
        let id = add_child(&mut store, Some("child2"), "New node").unwrap();
        assert_eq!(get(&store, &id).parent_id.as_deref(), Some("child2"));
        assert_eq!(get(&store, &id).content, "New node");

        let root = add_child(&mut store, None, "Another root").unwrap();
        assert!(get(&store, &root).parent_id.is_none());
    }

    #[test]
    fn add_child_unknown_parent_is_not_found() {
        let mut store = sample_store();
        let err = add_child(&mut store, Some("ghost"), "x").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.nodes().len(), 4);
    }

    #[test]
    fn add_sibling_shares_parent() {
        let mut store = sample_store();
        let id = add_sibling(&mut store, "grandchild", "Sib").unwrap();
        assert_eq!(get(&store, &id).parent_id.as_deref(), Some("child1"));

        let root_sib = add_sibling(&mut store, "root", "Sib").unwrap();
        assert!(get(&store, &root_sib).parent_id.is_none());
    }

    #[test]
    fn unknown_ids_write_nothing() {
        let mut store = CountingStore {
            inner: sample_store(),
            writes: 0,
        };
        let before = store.nodes().to_vec();
        assert!(add_sibling(&mut store, "ghost", "x").unwrap_err().is_not_found());
        assert!(delete_subtree(&mut store, "ghost").unwrap_err().is_not_found());
        assert!(add_parent(&mut store, "ghost", "x").is_err());
        assert!(toggle_collapse(&mut store, "ghost").is_err());
        assert!(edit_content(&mut store, "ghost", "x").is_err());
        assert!(reparent(&mut store, "ghost", None).is_err());
        assert_eq!(store.writes, 0);
        assert_eq!(store.nodes(), before.as_slice());
    }

    #[test]
    fn add_parent_inserts_above() {
        let mut store = sample_store();
        let new_id = add_parent(&mut store, "child1", "Wrapper").unwrap();
        assert_eq!(get(&store, &new_id).parent_id.as_deref(), Some("root"));
        assert_eq!(get(&store, "child1").parent_id.as_deref(), Some(new_id.as_str()));
        // Former sibling untouched
        assert_eq!(get(&store, "child2").parent_id.as_deref(), Some("root"));
        assert_eq!(get(&store, "grandchild").parent_id.as_deref(), Some("child1"));
    }

    #[test]
    fn add_parent_of_root_creates_new_root() {
        let mut store = sample_store();
        let new_id = add_parent(&mut store, "root", "Top").unwrap();
        assert!(get(&store, &new_id).parent_id.is_none());
        assert_eq!(get(&store, "root").parent_id.as_deref(), Some(new_id.as_str()));
    }

    #[test]
    fn delete_cascades_exactly() {
        let mut store = sample_store();
        let removed = delete_subtree(&mut store, "child1").unwrap();
        assert_eq!(removed, vec!["child1", "grandchild"]);
        assert_eq!(ids(&store), vec!["root", "child2"]);
    }

    #[test]
    fn delete_leaf() {
        let mut store = sample_store();
        delete_subtree(&mut store, "child2").unwrap();
        assert_eq!(ids(&store), vec!["root", "child1", "grandchild"]);
    }

    #[test]
    fn toggle_collapse_flips_even_on_leaf() {
        let mut store = sample_store();
        assert!(toggle_collapse(&mut store, "child2").unwrap());
        assert!(get(&store, "child2").is_collapsed());
        assert!(!toggle_collapse(&mut store, "child2").unwrap());
    }

    #[test]
    fn metadata_setters() {
        let mut store = sample_store();
        set_color(&mut store, "root", Some("red".into())).unwrap();
        set_icon(&mut store, "root", Some("★".into())).unwrap();
        set_style(&mut store, "root", NodeStyle::Text).unwrap();
        let meta = &get(&store, "root").metadata;
        assert_eq!(meta.color.as_deref(), Some("red"));
        assert_eq!(meta.icon.as_deref(), Some("★"));
        assert_eq!(meta.style(), NodeStyle::Text);

        set_color(&mut store, "root", None).unwrap();
        assert!(get(&store, "root").metadata.color.is_none());
    }

    #[test]
    fn edit_replaces_content() {
        let mut store = sample_store();
        edit_content(&mut store, "child1", "Renamed").unwrap();
        assert_eq!(get(&store, "child1").content, "Renamed");
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut store = sample_store();
        let err = reparent(&mut store, "root", Some("grandchild")).unwrap_err();
        assert!(matches!(err, ActionError::WouldCycle { .. }));
        let err = reparent(&mut store, "child1", Some("child1")).unwrap_err();
        assert!(matches!(err, ActionError::WouldCycle { .. }));
        assert_eq!(get(&store, "root").parent_id, None);
    }

    #[test]
    fn reparent_moves_subtree() {
        let mut store = sample_store();
        reparent(&mut store, "child1", Some("child2")).unwrap();
        assert_eq!(get(&store, "child1").parent_id.as_deref(), Some("child2"));
        reparent(&mut store, "child1", None).unwrap();
        assert!(get(&store, "child1").parent_id.is_none());
    }

    #[test]
    fn paste_remaps_ids_under_target() {
        let mut store = MemoryStore::new(vec![Node::new("T", "Target", None)]);
        let clipboard = Clipboard::from_nodes(vec![
            Node::new("A", "A", None),
            Node::new("B", "B", Some("A".into())),
        ]);
        let snapshot = clipboard.clone();

        let new_ids = paste(&mut store, &clipboard, Some("T")).unwrap();
        assert_eq!(new_ids.len(), 2);
        let a = get(&store, &new_ids[0]);
        let b = get(&store, &new_ids[1]);
        assert_eq!(a.parent_id.as_deref(), Some("T"));
        assert_eq!(b.parent_id.as_deref(), Some(a.id.as_str()));
        for id in &new_ids {
            assert!(!["T", "A", "B"].contains(&id.as_str()));
        }
        assert_eq!(clipboard, snapshot);
        assert_eq!(store.nodes().len(), 3);
    }

    #[test]
    fn paste_reports_root_first_for_any_clipboard_order() {
        let mut store = MemoryStore::new(vec![Node::new("T", "Target", None)]);
        let clipboard = Clipboard::from_nodes(vec![
            Node::new("B", "B", Some("A".into())),
            Node::new("A", "A", None),
        ]);
        let new_ids = paste(&mut store, &clipboard, Some("T")).unwrap();
        let root = get(&store, &new_ids[0]);
        assert_eq!(root.content, "A");
        assert_eq!(root.parent_id.as_deref(), Some("T"));
        assert_eq!(get(&store, &new_ids[1]).parent_id.as_deref(), Some(root.id.as_str()));
    }

    #[test]
    fn copy_after_reparent_pastes_root_first() {
        let mut store = MemoryStore::new(vec![
            Node::new("root", "Root", None),
            Node::new("x", "X", Some("root".into())),
            Node::new("a", "A", Some("root".into())),
        ]);
        reparent(&mut store, "x", Some("a")).unwrap();
        let clipboard = Clipboard::copy_subtree(store.nodes(), "a").unwrap();
        let new_ids = paste(&mut store, &clipboard, Some("root")).unwrap();
        let pasted = get(&store, &new_ids[0]);
        assert_eq!(pasted.content, "A");
        assert_eq!(pasted.parent_id.as_deref(), Some("root"));
        assert_eq!(get(&store, &new_ids[1]).content, "X");
    }

    #[test]
    fn paste_is_a_single_write() {
        let mut store = CountingStore::default();
        let clipboard = Clipboard::from_nodes(vec![
            Node::new("A", "A", None),
            Node::new("B", "B", Some("A".into())),
            Node::new("C", "C", Some("A".into())),
        ]);
        paste(&mut store, &clipboard, None).unwrap();
        assert_eq!(store.writes, 1);
        assert_eq!(store.nodes().len(), 3);
    }

    #[test]
    fn paste_empty_clipboard_is_noop() {
        let mut store = CountingStore::default();
        assert!(paste(&mut store, &Clipboard::default(), None).unwrap().is_empty());
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn import_is_idempotent() {
        let mut store = sample_store();
        let first = import_external(&mut store, "item-42", "Imported").unwrap();
        let Imported::Created(id) = &first else {
            panic!("expected Created, got {:?}", first);
        };
        assert_eq!(get(&store, id).metadata.source_item_id.as_deref(), Some("item-42"));

        let second = import_external(&mut store, "item-42", "Imported again").unwrap();
        assert_eq!(second, Imported::Existing(id.clone()));
        assert_eq!(store.nodes().len(), 5);
    }
}
