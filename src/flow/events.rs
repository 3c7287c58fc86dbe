use crate::io::store::{NodeStore, StoreError};
use crate::model::node::NodeStyle;

use super::{Flow, FlowEffect};

/// Requests raised by a rendered node (its editor, toolbar or context menu)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    StartEditRequested { node_id: String },
    EditCommitted { node_id: String, content: String },
    EditCancelled { node_id: String },
    AddChildRequested { parent_id: String },
    AddSiblingRequested { node_id: String },
    AddParentRequested { node_id: String },
    DeleteRequested { node_id: String },
    ToggleCollapseRequested { node_id: String },
    SetColorRequested { node_id: String, color: Option<String> },
    SetIconRequested { node_id: String, icon: Option<String> },
    SetStyleRequested { node_id: String, style: NodeStyle },
    OpenRequested { node_id: String },
}

impl NodeEvent {
    pub fn node_id(&self) -> &str {
        match self {
            NodeEvent::StartEditRequested { node_id }
            | NodeEvent::EditCommitted { node_id, .. }
            | NodeEvent::EditCancelled { node_id }
            | NodeEvent::AddSiblingRequested { node_id }
            | NodeEvent::AddParentRequested { node_id }
            | NodeEvent::DeleteRequested { node_id }
            | NodeEvent::ToggleCollapseRequested { node_id }
            | NodeEvent::SetColorRequested { node_id, .. }
            | NodeEvent::SetIconRequested { node_id, .. }
            | NodeEvent::SetStyleRequested { node_id, .. }
            | NodeEvent::OpenRequested { node_id } => node_id,
            NodeEvent::AddChildRequested { parent_id } => parent_id,
        }
    }
}

impl<S: NodeStore> Flow<S> {
    /// Route a node event to its action. Events for ids that no longer exist
    /// are dropped.
    pub fn dispatch(&mut self, event: NodeEvent) -> Result<FlowEffect, StoreError> {
        tracing::trace!(?event, "node event");
        match event {
            NodeEvent::StartEditRequested { node_id } => Ok(self.begin_edit(&node_id)),
            NodeEvent::EditCommitted { node_id, content } => {
                if self.editing.as_deref() == Some(node_id.as_str()) {
                    self.editing = None;
                }
                self.edit_content(&node_id, &content)
            }
            NodeEvent::EditCancelled { node_id } => {
                if self.editing.as_deref() == Some(node_id.as_str()) {
                    self.editing = None;
                }
                Ok(FlowEffect::None)
            }
            NodeEvent::AddChildRequested { parent_id } => self.add_child(Some(&parent_id)),
            NodeEvent::AddSiblingRequested { node_id } => self.add_sibling(&node_id),
            NodeEvent::AddParentRequested { node_id } => self.add_parent(&node_id),
            NodeEvent::DeleteRequested { node_id } => self.delete(&node_id),
            NodeEvent::ToggleCollapseRequested { node_id } => self.toggle_collapse(&node_id),
            NodeEvent::SetColorRequested { node_id, color } => self.set_color(&node_id, color),
            NodeEvent::SetIconRequested { node_id, icon } => self.set_icon(&node_id, icon),
            NodeEvent::SetStyleRequested { node_id, style } => self.set_style(&node_id, style),
            NodeEvent::OpenRequested { node_id } => {
                let source = self
                    .node(&node_id)
                    .and_then(|n| n.metadata.source_item_id.clone());
                match source {
                    Some(source) => Ok(FlowEffect::Open(source)),
                    None => Ok(FlowEffect::None),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edit_commit_event_updates_content() {
        let mut flow = sample_flow();
        flow.dispatch(NodeEvent::StartEditRequested {
            node_id: "child2".into(),
        })
        .unwrap();
        let effect = flow
            .dispatch(NodeEvent::EditCommitted {
                node_id: "child2".into(),
                content: "Second".into(),
            })
            .unwrap();
        assert_eq!(effect, FlowEffect::Changed);
        assert_eq!(flow.node("child2").unwrap().content, "Second");
        assert!(!flow.is_editing());
    }

    #[test]
    fn blank_commit_keeps_content() {
        let mut flow = sample_flow();
        let effect = flow
            .dispatch(NodeEvent::EditCommitted {
                node_id: "child2".into(),
                content: "".into(),
            })
            .unwrap();
        assert_eq!(effect, FlowEffect::None);
        assert_eq!(flow.node("child2").unwrap().content, "Child 2");
    }

    #[test]
    fn style_events_set_metadata() {
        let mut flow = sample_flow();
        flow.dispatch(NodeEvent::SetColorRequested {
            node_id: "root".into(),
            color: Some("red".into()),
        })
        .unwrap();
        flow.dispatch(NodeEvent::SetIconRequested {
            node_id: "root".into(),
            icon: Some("★".into()),
        })
        .unwrap();
        flow.dispatch(NodeEvent::SetStyleRequested {
            node_id: "root".into(),
            style: NodeStyle::Dot,
        })
        .unwrap();
        let meta = &flow.node("root").unwrap().metadata;
        assert_eq!(meta.color.as_deref(), Some("red"));
        assert_eq!(meta.icon.as_deref(), Some("★"));
        assert_eq!(meta.style(), NodeStyle::Dot);

        flow.undo().unwrap();
        assert_eq!(flow.node("root").unwrap().metadata.style(), NodeStyle::Card);
    }

    #[test]
    fn structural_events() {
        let mut flow = sample_flow();
        flow.dispatch(NodeEvent::AddChildRequested {
            parent_id: "grandchild".into(),
        })
        .unwrap();
        let added = flow.selected().unwrap().to_string();
        assert_eq!(flow.node(&added).unwrap().parent_id.as_deref(), Some("grandchild"));

        flow.dispatch(NodeEvent::DeleteRequested {
            node_id: "child1".into(),
        })
        .unwrap();
        assert_eq!(ids(&flow), vec!["root", "child2"]);
        assert_eq!(flow.selected(), Some("root"));
    }

    #[test]
    fn events_for_missing_nodes_are_dropped() {
        let mut flow = sample_flow();
        let effect = flow
            .dispatch(NodeEvent::ToggleCollapseRequested {
                node_id: "ghost".into(),
            })
            .unwrap();
        assert_eq!(effect, FlowEffect::None);
        assert!(!flow.can_undo());
    }

    #[test]
    fn open_reports_source_record() {
        let mut flow = empty_flow();
        flow.drop_external("task-7", "Write docs").unwrap();
        let id = flow.selected().unwrap().to_string();
        assert_eq!(
            flow.dispatch(NodeEvent::OpenRequested { node_id: id }).unwrap(),
            FlowEffect::Open("task-7".into())
        );

        let mut flow = sample_flow();
        assert_eq!(
            flow.dispatch(NodeEvent::OpenRequested {
                node_id: "root".into()
            })
            .unwrap(),
            FlowEffect::None
        );
    }

    #[test]
    fn node_id_accessor() {
        let event = NodeEvent::AddChildRequested {
            parent_id: "p".into(),
        };
        assert_eq!(event.node_id(), "p");
    }
}
