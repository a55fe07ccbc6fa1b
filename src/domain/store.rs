//! Arena-backed tree store.
//!
//! `Node::parent_id` is the source of truth for structure; the per-node child
//! index lists and the edge list are derived from it. Every mutation validates
//! fully before touching state, so a failed call leaves the store unchanged.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{Edge, Node, NodeId, Position, Topology};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::{IdGenerator, RandomIdGenerator};
use crate::domain::node_type::NodeTypeRegistry;

const MAX_ID_ATTEMPTS: usize = 64;

/// Arena slot: the node plus its structural links.
#[derive(Debug)]
pub struct TreeNode {
    pub node: Node,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// In-memory collection of typed nodes forming a forest.
pub struct TreeStore {
    registry: Arc<NodeTypeRegistry>,
    ids: Box<dyn IdGenerator>,
    arena: Arena<TreeNode>,
    index: HashMap<NodeId, Index>,
    /// Live nodes in insertion order
    order: Vec<Index>,
}

impl fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore")
            .field("nodes", &self.order.len())
            .field("roots", &self.roots().len())
            .finish_non_exhaustive()
    }
}

impl TreeStore {
    pub fn new(registry: Arc<NodeTypeRegistry>) -> Self {
        Self::with_id_generator(registry, Box::new(RandomIdGenerator::default()))
    }

    pub fn with_id_generator(registry: Arc<NodeTypeRegistry>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            registry,
            ids,
            arena: Arena::new(),
            index: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Insert a parentless node of a root-eligible type.
    #[instrument(level = "debug", skip(self))]
    pub fn add_root(&mut self, type_name: &str) -> DomainResult<NodeId> {
        let node_type = self.registry.lookup(type_name)?;
        if !node_type.can_be_root {
            return Err(DomainError::InvalidRootType(type_name.to_string()));
        }

        let id = self.fresh_id()?;
        self.insert(id.clone(), type_name, None);
        debug!("added root {} ({})", id, type_name);
        Ok(id)
    }

    /// Insert a node under `parent_id`, if the parent's type allows `type_name`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent_id: &NodeId, type_name: &str) -> DomainResult<NodeId> {
        let parent_idx = self.index_of(parent_id)?;
        let parent_type = &self.arena[parent_idx].node.node_type;
        // allowed_children only names registered types, so this also rejects unknown names
        if !self.registry.lookup(parent_type)?.allows_child(type_name) {
            return Err(DomainError::DisallowedChildType {
                parent_type: parent_type.clone(),
                child_type: type_name.to_string(),
            });
        }

        let id = self.fresh_id()?;
        self.insert(id.clone(), type_name, Some(parent_idx));
        debug!("added child {} ({}) under {}", id, type_name, parent_id);
        Ok(id)
    }

    /// Remove `node_id` and all of its descendants.
    ///
    /// Returns the removed ids in pre-order, starting with `node_id`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_subtree(&mut self, node_id: &NodeId) -> DomainResult<Vec<NodeId>> {
        let root_idx = self.index_of(node_id)?;

        // Collect the whole subtree before mutating: removal invalidates the child lists.
        let mut doomed = vec![root_idx];
        doomed.extend(self.collect_descendants(root_idx));
        let doomed_set: HashSet<Index> = doomed.iter().copied().collect();

        if let Some(parent_idx) = self.arena[root_idx].parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != root_idx);
            }
        }

        let mut removed = Vec::with_capacity(doomed.len());
        for idx in doomed {
            if let Some(slot) = self.arena.remove(idx) {
                self.index.remove(&slot.node.id);
                removed.push(slot.node.id);
            }
        }
        self.order.retain(|idx| !doomed_set.contains(idx));

        debug!("deleted {} node(s) rooted at {}", removed.len(), node_id);
        Ok(removed)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&Node> {
        self.index.get(node_id).map(|&idx| &self.arena[idx].node)
    }

    /// Like `get`, but a missing node is a `NodeNotFound` error.
    pub fn node(&self, node_id: &NodeId) -> DomainResult<&Node> {
        self.index_of(node_id).map(|idx| &self.arena[idx].node)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.index.contains_key(node_id)
    }

    /// Direct children in insertion order; empty for unknown ids.
    pub fn children_of(&self, node_id: &NodeId) -> Vec<&Node> {
        self.index
            .get(node_id)
            .map(|&idx| {
                self.arena[idx]
                    .children
                    .iter()
                    .filter_map(|&c| self.arena.get(c))
                    .map(|slot| &slot.node)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All transitive descendants in pre-order, excluding `node_id` itself.
    pub fn descendants(&self, node_id: &NodeId) -> Vec<NodeId> {
        match self.index.get(node_id) {
            Some(&idx) => self
                .collect_descendants(idx)
                .into_iter()
                .map(|i| self.arena[i].node.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of transitive descendants; 0 for leaves and unknown ids.
    pub fn descendant_count(&self, node_id: &NodeId) -> usize {
        self.index
            .get(node_id)
            .map(|&idx| self.collect_descendants(idx).len())
            .unwrap_or(0)
    }

    /// Parent chain from the direct parent up to the root.
    pub fn ancestors(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.index.get(node_id).and_then(|&idx| self.arena[idx].parent);
        while let Some(idx) = current {
            if !seen.insert(idx) {
                break;
            }
            match self.arena.get(idx) {
                Some(slot) => {
                    chain.push(slot.node.id.clone());
                    current = slot.parent;
                }
                None => break,
            }
        }
        chain
    }

    /// Snapshot of live nodes in insertion order.
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.nodes().collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().map(move |&idx| &self.arena[idx].node)
    }

    /// Edges derived from parent pointers, in child insertion order.
    pub fn all_edges(&self) -> Vec<Edge> {
        self.nodes()
            .filter_map(|n| n.parent_id.as_ref().map(|p| Edge::between(p, &n.id)))
            .collect()
    }

    pub fn roots(&self) -> Vec<&Node> {
        self.nodes().filter(|n| n.is_root()).collect()
    }

    pub fn topology(&self) -> Topology {
        Topology {
            nodes: self.order.len(),
            edges: self.nodes().filter(|n| !n.is_root()).count(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Overwrite display positions. Unknown ids are ignored.
    #[instrument(level = "trace", skip(self, positions))]
    pub fn apply_positions(&mut self, positions: &HashMap<NodeId, Position>) {
        for (id, position) in positions {
            if let Some(&idx) = self.index.get(id) {
                self.arena[idx].node.position = *position;
            }
        }
    }

    fn index_of(&self, node_id: &NodeId) -> DomainResult<Index> {
        self.index
            .get(node_id)
            .copied()
            .ok_or_else(|| DomainError::NodeNotFound(node_id.clone()))
    }

    fn fresh_id(&mut self) -> DomainResult<NodeId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !self.index.contains_key(&candidate) {
                return Ok(candidate);
            }
            debug!("id collision on {}, retrying", candidate);
        }
        Err(DomainError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn insert(&mut self, id: NodeId, type_name: &str, parent: Option<Index>) {
        let node = Node {
            id: id.clone(),
            node_type: type_name.to_string(),
            parent_id: parent.map(|p| self.arena[p].node.id.clone()),
            position: Position::default(),
        };
        let idx = self.arena.insert(TreeNode {
            node,
            parent,
            children: Vec::new(),
        });
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(idx);
            }
        }
        self.index.insert(id, idx);
        self.order.push(idx);
    }

    /// Pre-order walk below `start`, never visiting a slot twice.
    fn collect_descendants(&self, start: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut stack: Vec<Index> = self
            .arena
            .get(start)
            .map(|slot| slot.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            if let Some(slot) = self.arena.get(idx) {
                result.push(idx);
                // Push children in reverse order for left-to-right traversal
                stack.extend(slot.children.iter().rev().copied());
            }
        }
        result
    }
}
