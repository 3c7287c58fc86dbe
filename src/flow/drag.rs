use crate::io::store::{NodeStore, StoreError};
use crate::ops::actions::{self, Imported};
use crate::ops::layout::Rect;
use crate::ops::tree::TreeIndex;

use super::{Flow, FlowEffect};

/// How a node drop resolved
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The node now hangs under `parent`
    Reparented { parent: String },
    /// No valid target; the node goes back to its last laid-out position
    SnappedBack { x: f64, y: f64 },
    /// The dragged id is not on screen
    Ignored,
}

impl<S: NodeStore> Flow<S> {
    /// Drop node `id` with its box's top-left at (`x`, `y`).
    ///
    /// The target is the first other laid-out node whose box overlaps the
    /// dropped box. The drop is refused when the target is the node's own
    /// descendant (a cycle) or already its parent.
    pub fn drop_node(&mut self, id: &str, x: f64, y: f64) -> Result<DropOutcome, StoreError> {
        let Some(origin) = self.layout.node(id) else {
            return Ok(DropOutcome::Ignored);
        };
        let snap_back = DropOutcome::SnappedBack {
            x: origin.x,
            y: origin.y,
        };
        let dropped = Rect {
            x,
            y,
            width: origin.width,
            height: origin.height,
        };

        let target = self
            .layout
            .nodes
            .iter()
            .find(|n| n.id != id && n.rect().overlaps(&dropped))
            .map(|n| n.id.clone());
        let Some(target) = target else {
            return Ok(snap_back);
        };

        {
            let index = TreeIndex::new(self.store.nodes());
            if index.is_descendant(id, &target) || index.parent(id) == Some(target.as_str()) {
                tracing::debug!(node = id, %target, "drop refused");
                return Ok(snap_back);
            }
        }

        match self.mutate(|store| actions::reparent(store, id, Some(target.as_str())))? {
            Some(()) => {
                self.selected = Some(id.to_string());
                Ok(DropOutcome::Reparented { parent: target })
            }
            None => Ok(snap_back),
        }
    }

    /// Drop an external record onto the canvas. A record that is already on
    /// the map is selected instead of duplicated.
    pub fn drop_external(
        &mut self,
        source_item_id: &str,
        content: &str,
    ) -> Result<FlowEffect, StoreError> {
        let existing = self
            .nodes()
            .iter()
            .find(|n| n.metadata.source_item_id.as_deref() == Some(source_item_id))
            .map(|n| n.id.clone());
        if let Some(id) = existing {
            tracing::debug!(%id, source_item_id, "external record already on map");
            self.selected = Some(id);
            return Ok(FlowEffect::Selected);
        }

        let imported = self.mutate(|store| actions::import_external(store, source_item_id, content))?;
        match imported {
            Some(Imported::Created(id)) => {
                self.selected = Some(id);
                Ok(FlowEffect::Changed)
            }
            Some(Imported::Existing(id)) => {
                self.selected = Some(id);
                Ok(FlowEffect::Selected)
            }
            None => Ok(FlowEffect::None),
        }
    }
}
