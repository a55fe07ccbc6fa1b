//! Editing session: one store, one selection, one layout.
//!
//! Every mutation runs the same pipeline: apply to the store, and if the node or
//! edge count changed, recompute the layout and notify topology listeners. The
//! selection is re-resolved last so it never points at a deleted node.

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    Direction, LayoutAdapter, Node, NodeId, NodeType, SelectionController, Topology,
    TopologyChange, TreeStore,
};

/// Callback invoked after each topology change.
pub type TopologyListener = Box<dyn FnMut(&TopologyChange)>;

/// Everything shown when inspecting one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub node: Node,
    pub node_type: NodeType,
    /// Parent chain, nearest first
    pub ancestors: Vec<NodeId>,
    /// Direct children, in insertion order
    pub children: Vec<Node>,
    pub descendant_count: usize,
}

impl NodeDetails {
    pub fn can_have_children(&self) -> bool {
        !self.node_type.allowed_children.is_empty()
    }
}

pub struct TreeSession {
    store: TreeStore,
    selection: SelectionController,
    layout: Box<dyn LayoutAdapter>,
    direction: Direction,
    listeners: Vec<TopologyListener>,
}

impl TreeSession {
    pub fn new(store: TreeStore, layout: Box<dyn LayoutAdapter>, direction: Direction) -> Self {
        Self {
            store,
            selection: SelectionController::new(),
            layout,
            direction,
            listeners: Vec::new(),
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn subscribe(&mut self, listener: TopologyListener) {
        self.listeners.push(listener);
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_root(&mut self, type_name: &str) -> ApplicationResult<NodeId> {
        let before = self.store.topology();
        let id = self.store.add_root(type_name)?;
        self.after_mutation(before);
        info!("root {} ({}) created", id, type_name);
        Ok(id)
    }

    /// Add a child under `parent`, or under the selected node when `parent` is None.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Option<&NodeId>, type_name: &str) -> ApplicationResult<NodeId> {
        let parent = self.resolve_target(parent)?;
        let before = self.store.topology();
        let id = self.store.add_child(&parent, type_name)?;
        self.after_mutation(before);
        info!("child {} ({}) created under {}", id, type_name, parent);
        Ok(id)
    }

    /// Delete a subtree rooted at `target`, or at the selected node when None.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, target: Option<&NodeId>) -> ApplicationResult<Vec<NodeId>> {
        let target = self.resolve_target(target)?;
        let before = self.store.topology();
        let removed = self.store.delete_subtree(&target)?;
        self.after_mutation(before);
        info!("deleted {} and {} descendant(s)", target, removed.len() - 1);
        Ok(removed)
    }

    /// Select a live node.
    pub fn select(&mut self, node_id: &NodeId) -> ApplicationResult<&Node> {
        let node = self.store.node(node_id)?;
        self.selection.select(node_id.clone());
        Ok(node)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The selected node, if it is still live.
    pub fn selected(&mut self) -> Option<&Node> {
        self.selection.resolve(&self.store)
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selection.selected_id()
    }

    pub fn inspect(&self, node_id: &NodeId) -> ApplicationResult<NodeDetails> {
        let node = self.store.node(node_id)?;
        let node_type = self.store.registry().lookup(&node.node_type)?;
        Ok(NodeDetails {
            node: node.clone(),
            node_type: node_type.clone(),
            ancestors: self.store.ancestors(node_id),
            children: self.store.children_of(node_id).into_iter().cloned().collect(),
            descendant_count: self.store.descendant_count(node_id),
        })
    }

    /// The node an operation applies to: `explicit` when given, otherwise the
    /// live selection. Existence of `explicit` is left to the operation.
    pub fn resolve_target(&mut self, explicit: Option<&NodeId>) -> ApplicationResult<NodeId> {
        match explicit {
            Some(id) => Ok(id.clone()),
            None => self
                .selected()
                .map(|n| n.id.clone())
                .ok_or(ApplicationError::NoSelection),
        }
    }

    fn after_mutation(&mut self, before: Topology) {
        let after = self.store.topology();
        if after != before {
            self.relayout();
            let change = TopologyChange { before, after };
            for listener in self.listeners.iter_mut() {
                listener(&change);
            }
        }
        self.selection.resolve(&self.store);
    }

    fn relayout(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let positions = {
            let nodes = self.store.all_nodes();
            let edges = self.store.all_edges();
            self.layout.compute_layout(&nodes, &edges, self.direction)
        };
        debug!("layout assigned {} position(s)", positions.len());
        self.store.apply_positions(&positions);
    }
}
