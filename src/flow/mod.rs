//! Interaction layer between a front end and the mindmap core.
//!
//! `Flow` owns the selection, edit focus, clipboard and undo history for one
//! map, and turns keys, node events and drops into actions on its store.
//! Every mutation snapshots the tree first, then runs the action, then moves
//! the selection to the action's result.

mod drag;
mod events;
mod keys;

pub use drag::DropOutcome;
pub use events::NodeEvent;
pub use keys::{Key, KeyInput, Nav};

use crate::io::store::{NodeStore, StoreError};
use crate::model::config::{LayoutConfig, MapConfig};
use crate::model::node::Node;
use crate::ops::actions::{self, ActionError};
use crate::ops::clipboard::Clipboard;
use crate::ops::history::History;
use crate::ops::layout::{self, Direction, Layout};
use crate::ops::tree::TreeIndex;

/// What a front end should do after handing an input to `Flow`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    /// Nothing changed
    None,
    /// The tree changed (selection may have moved too)
    Changed,
    /// Only the selection moved
    Selected,
    /// The clipboard was filled
    Copied,
    /// Open an inline editor for this node
    EditStarted(String),
    /// The user asked to open this node's source record
    Open(String),
}

pub struct Flow<S: NodeStore> {
    store: S,
    history: History,
    layout_config: LayoutConfig,
    placeholder: String,
    direction: Direction,
    selected: Option<String>,
    editing: Option<String>,
    clipboard: Clipboard,
    layout: Layout,
}

impl<S: NodeStore> Flow<S> {
    pub fn new(store: S, config: &MapConfig) -> Self {
        let mut flow = Flow {
            store,
            history: History::new(config.history.capacity),
            layout_config: config.layout.clone(),
            placeholder: config.nodes.placeholder.clone(),
            direction: config.layout.direction,
            selected: None,
            editing: None,
            clipboard: Clipboard::default(),
            layout: Layout::default(),
        };
        flow.relayout();
        flow
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.store.nodes().iter().find(|n| n.id == id)
    }

    /// Positions as of the last change
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.relayout();
        }
    }

    pub fn cycle_direction(&mut self) -> Direction {
        self.set_direction(self.direction.next());
        self.direction
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `id` if it exists; returns whether the selection changed
    pub fn select(&mut self, id: &str) -> bool {
        if self.node(id).is_none() || self.selected.as_deref() == Some(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Editing focus
    // -----------------------------------------------------------------------

    pub fn begin_edit(&mut self, id: &str) -> FlowEffect {
        if self.node(id).is_none() {
            return FlowEffect::None;
        }
        self.selected = Some(id.to_string());
        self.editing = Some(id.to_string());
        FlowEffect::EditStarted(id.to_string())
    }

    /// Commit the open editor. Blank text is rejected and the editor closes.
    pub fn commit_edit(&mut self, content: &str) -> Result<FlowEffect, StoreError> {
        let Some(id) = self.editing.take() else {
            return Ok(FlowEffect::None);
        };
        self.edit_content(&id, content)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // -----------------------------------------------------------------------
    // Mutations (snapshot → action → selection)
    // -----------------------------------------------------------------------

    pub fn add_child(&mut self, parent_id: Option<&str>) -> Result<FlowEffect, StoreError> {
        if parent_id.is_some_and(|id| !self.exists(id)) {
            return Ok(FlowEffect::None);
        }
        let placeholder = self.placeholder.clone();
        self.mutate(|store| actions::add_child(store, parent_id, &placeholder))
            .map(|id| self.select_created(id))
    }

    pub fn add_sibling(&mut self, node_id: &str) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let placeholder = self.placeholder.clone();
        self.mutate(|store| actions::add_sibling(store, node_id, &placeholder))
            .map(|id| self.select_created(id))
    }

    pub fn add_parent(&mut self, node_id: &str) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let placeholder = self.placeholder.clone();
        self.mutate(|store| actions::add_parent(store, node_id, &placeholder))
            .map(|id| self.select_created(id))
    }

    pub fn delete(&mut self, node_id: &str) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let parent = TreeIndex::new(self.store.nodes())
            .parent(node_id)
            .map(String::from);
        let removed = self.mutate(|store| actions::delete_subtree(store, node_id))?;
        let Some(removed) = removed else {
            return Ok(FlowEffect::None);
        };
        if self
            .selected
            .as_ref()
            .is_some_and(|sel| removed.contains(sel))
        {
            self.selected = parent;
        }
        if self.editing.as_ref().is_some_and(|e| removed.contains(e)) {
            self.editing = None;
        }
        Ok(FlowEffect::Changed)
    }

    pub fn toggle_collapse(&mut self, node_id: &str) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let changed = self.mutate(|store| actions::toggle_collapse(store, node_id))?;
        Ok(changed_or_none(changed))
    }

    /// Blank content is ignored (the caller keeps the old text)
    pub fn edit_content(&mut self, node_id: &str, content: &str) -> Result<FlowEffect, StoreError> {
        let content = content.trim();
        if content.is_empty() || !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        if self.node(node_id).is_some_and(|n| n.content == content) {
            return Ok(FlowEffect::None);
        }
        let changed = self.mutate(|store| actions::edit_content(store, node_id, content))?;
        Ok(changed_or_none(changed))
    }

    pub fn set_color(&mut self, node_id: &str, color: Option<String>) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let changed = self.mutate(|store| actions::set_color(store, node_id, color))?;
        Ok(changed_or_none(changed))
    }

    pub fn set_icon(&mut self, node_id: &str, icon: Option<String>) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let changed = self.mutate(|store| actions::set_icon(store, node_id, icon))?;
        Ok(changed_or_none(changed))
    }

    pub fn set_style(
        &mut self,
        node_id: &str,
        style: crate::model::node::NodeStyle,
    ) -> Result<FlowEffect, StoreError> {
        if !self.exists(node_id) {
            return Ok(FlowEffect::None);
        }
        let changed = self.mutate(|store| actions::set_style(store, node_id, style))?;
        Ok(changed_or_none(changed))
    }

    /// Copy the selected subtree. No-op without a selection.
    pub fn copy(&mut self) -> FlowEffect {
        let Some(selected) = self.selected.as_deref() else {
            return FlowEffect::None;
        };
        match Clipboard::copy_subtree(self.store.nodes(), selected) {
            Some(clipboard) => {
                tracing::debug!(count = clipboard.nodes().len(), "copied subtree");
                self.clipboard = clipboard;
                FlowEffect::Copied
            }
            None => FlowEffect::None,
        }
    }

    /// Paste under the selection, or as a new root. No-op on empty clipboard.
    pub fn paste(&mut self) -> Result<FlowEffect, StoreError> {
        if self.clipboard.is_empty() {
            return Ok(FlowEffect::None);
        }
        let target = self.selected.clone().filter(|id| self.exists(id));
        let clipboard = self.clipboard.clone();
        let ids = self.mutate(|store| actions::paste(store, &clipboard, target.as_deref()))?;
        match ids.and_then(|ids| ids.into_iter().next()) {
            Some(first) => {
                self.selected = Some(first);
                Ok(FlowEffect::Changed)
            }
            None => Ok(FlowEffect::None),
        }
    }

    pub fn undo(&mut self) -> Result<FlowEffect, StoreError> {
        let Some(restored) = self.history.undo(self.store.nodes()) else {
            return Ok(FlowEffect::None);
        };
        self.restore(restored)
    }

    pub fn redo(&mut self) -> Result<FlowEffect, StoreError> {
        let Some(restored) = self.history.redo(self.store.nodes()) else {
            return Ok(FlowEffect::None);
        };
        self.restore(restored)
    }

    fn restore(&mut self, nodes: Vec<Node>) -> Result<FlowEffect, StoreError> {
        let result = actions::replace_all(&mut self.store, nodes);
        self.after_change();
        match result {
            Ok(()) => Ok(FlowEffect::Changed),
            Err(ActionError::Store(e)) => Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "restore absorbed");
                Ok(FlowEffect::Changed)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn exists(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Run `f`, record the prior tree as an undo point, relayout. Not-found
    /// and cycle errors are absorbed as `Ok(None)` and leave history alone;
    /// store errors propagate after the in-memory change.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut S) -> Result<T, ActionError>,
    ) -> Result<Option<T>, StoreError> {
        let before = self.store.nodes().to_vec();
        let result = f(&mut self.store);
        if matches!(result, Ok(_) | Err(ActionError::Store(_))) {
            self.history.push_snapshot(&before);
        }
        self.after_change();
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ActionError::Store(e)) => Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "action absorbed");
                Ok(None)
            }
        }
    }

    fn select_created(&mut self, id: Option<String>) -> FlowEffect {
        match id {
            Some(id) => {
                self.selected = Some(id);
                FlowEffect::Changed
            }
            None => FlowEffect::None,
        }
    }

    fn after_change(&mut self) {
        let nodes = self.store.nodes();
        let present = |id: &Option<String>| {
            id.as_deref()
                .is_some_and(|id| nodes.iter().any(|n| n.id == id))
        };
        if !present(&self.selected) {
            self.selected = None;
        }
        if !present(&self.editing) {
            self.editing = None;
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = layout::layout(self.store.nodes(), self.direction, &self.layout_config);
    }
}

fn changed_or_none<T>(result: Option<T>) -> FlowEffect {
    if result.is_some() {
        FlowEffect::Changed
    } else {
        FlowEffect::None
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;
    use crate::io::store::MemoryStore;

    pub fn sample_nodes() -> Vec<Node> {
        vec![
            Node::new("root", "Root", None),
            Node::new("child1", "Child 1", Some("root".into())),
            Node::new("grandchild", "Grandchild", Some("child1".into())),
            Node::new("child2", "Child 2", Some("root".into())),
        ]
    }

    pub fn sample_flow() -> Flow<MemoryStore> {
        Flow::new(MemoryStore::new(sample_nodes()), &MapConfig::default())
    }

    pub fn empty_flow() -> Flow<MemoryStore> {
        Flow::new(MemoryStore::default(), &MapConfig::default())
    }

    pub fn ids<S: NodeStore>(flow: &Flow<S>) -> Vec<&str> {
        flow.nodes().iter().map(|n| n.id.as_str()).collect()
    }
}
