//! Active-node selection held by id and re-resolved against the store.

use tracing::debug;

use crate::domain::entities::{Node, NodeId};
use crate::domain::store::TreeStore;

/// Tracks at most one selected node.
///
/// Holds only the id, never a reference into the store. A selection whose node
/// has been deleted resolves to nothing and is cleared silently.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<NodeId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existence is not checked here; `resolve` does that.
    pub fn select(&mut self, node_id: NodeId) {
        debug!("select {}", node_id);
        self.selected = Some(node_id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The raw selected id, which may be stale until the next `resolve`.
    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn resolve<'s>(&mut self, store: &'s TreeStore) -> Option<&'s Node> {
        let id = self.selected.as_ref()?;
        match store.get(id) {
            Some(node) => Some(node),
            None => {
                debug!("selected node {} is gone, clearing selection", id);
                self.selected = None;
                None
            }
        }
    }
}
