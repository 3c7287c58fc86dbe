use std::collections::VecDeque;

use crate::model::node::Node;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One whole-tree snapshot plus its serialized form for no-op detection
#[derive(Debug, Clone)]
struct Snapshot {
    nodes: Vec<Node>,
    key: String,
}

impl Snapshot {
    fn capture(nodes: &[Node]) -> Self {
        Snapshot {
            nodes: nodes.to_vec(),
            key: serialize(nodes),
        }
    }
}

fn serialize(nodes: &[Node]) -> String {
    // Node only holds strings, bools and JSON values, so this cannot fail
    serde_json::to_string(nodes).unwrap_or_default()
}

/// Bounded undo/redo over whole-tree snapshots.
///
/// Call `push_snapshot` with the tree as it is *before* a mutation. `undo`
/// and `redo` take the tree as it is *now* and hand back the snapshot the
/// caller should restore.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            past: VecDeque::new(),
            future: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record `current` as an undo point. Skipped when identical to the most
    /// recent undo point. Clears the redo stack otherwise.
    pub fn push_snapshot(&mut self, current: &[Node]) {
        let snapshot = Snapshot::capture(current);
        if self.past.back().is_some_and(|last| last.key == snapshot.key) {
            return;
        }
        self.past.push_back(snapshot);
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back. Returns the tree to restore, or None if nothing to undo.
    pub fn undo(&mut self, current: &[Node]) -> Option<Vec<Node>> {
        let snapshot = self.past.pop_back()?;
        self.future.push(Snapshot::capture(current));
        Some(snapshot.nodes)
    }

    /// Step forward. Returns the tree to restore, or None if nothing to redo.
    pub fn redo(&mut self, current: &[Node]) -> Option<Vec<Node>> {
        let snapshot = self.future.pop()?;
        self.past.push_back(Snapshot::capture(current));
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        Some(snapshot.nodes)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(label: &str) -> Vec<Node> {
        vec![
            Node::new("root", "Root", None),
            Node::new("a", label, Some("root".into())),
        ]
    }

    /// Drives History the way the orchestrator does: snapshot, then mutate
    struct Harness {
        history: History,
        nodes: Vec<Node>,
    }

    impl Harness {
        fn new(nodes: Vec<Node>) -> Self {
            Harness {
                history: History::default(),
                nodes,
            }
        }

        fn edit(&mut self, label: &str) {
            self.history.push_snapshot(&self.nodes);
            self.nodes[1].content = label.to_string();
        }

        fn undo(&mut self) -> bool {
            match self.history.undo(&self.nodes) {
                Some(restored) => {
                    self.nodes = restored;
                    true
                }
                None => false,
            }
        }

        fn redo(&mut self) -> bool {
            match self.history.redo(&self.nodes) {
                Some(restored) => {
                    self.nodes = restored;
                    true
                }
                None => false,
            }
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.capacity(), 50);
    }

    #[test]
    fn undo_then_redo_round_trip() {
        let mut h = Harness::new(tree("S0"));
        h.edit("S1");
        assert!(h.undo());
        assert_eq!(h.nodes, tree("S0"));
        assert!(h.redo());
        assert_eq!(h.nodes, tree("S1"));
    }

    #[test]
    fn two_deep_sequence() {
        let mut h = Harness::new(tree("S0"));
        h.edit("S1");
        h.edit("S2");
        assert!(h.undo());
        assert!(h.undo());
        assert_eq!(h.nodes, tree("S0"));
        assert!(h.redo());
        assert_eq!(h.nodes, tree("S1"));
        assert!(h.history.can_redo());
    }

    #[test]
    fn capacity_caps_undo_steps() {
        let mut h = Harness::new(tree("v0"));
        for i in 1..=60 {
            h.edit(&format!("v{}", i));
        }
        assert_eq!(h.history.undo_len(), 50);
        let mut steps = 0;
        while h.undo() {
            steps += 1;
        }
        assert_eq!(steps, 50);
        // Oldest reachable state is v10; v0..v9 were evicted
        assert_eq!(h.nodes, tree("v10"));
    }

    #[test]
    fn duplicate_push_is_absorbed() {
        let mut history = History::default();
        let nodes = tree("same");
        history.push_snapshot(&nodes);
        history.push_snapshot(&nodes);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn push_clears_redo() {
        let mut h = Harness::new(tree("S0"));
        h.edit("S1");
        h.undo();
        assert!(h.history.can_redo());
        h.edit("S2");
        assert!(!h.history.can_redo());
    }

    #[test]
    fn undo_and_redo_on_empty_are_noops() {
        let mut h = Harness::new(tree("S0"));
        assert!(!h.undo());
        assert!(!h.redo());
        assert_eq!(h.nodes, tree("S0"));
    }

    #[test]
    fn undo_captures_current_state_fresh() {
        let mut h = Harness::new(tree("S0"));
        h.edit("S1");
        // A change made without a snapshot still lands on the redo stack
        h.nodes[1].content = "S1-tweaked".into();
        h.undo();
        h.redo();
        assert_eq!(h.nodes, tree("S1-tweaked"));
    }
}
