//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique among live nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Display coordinate (top-left corner). Advisory only, assigned by layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A live tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Name of a type in the `NodeTypeRegistry`
    pub node_type: String,
    /// None for root nodes
    pub parent_id: Option<NodeId>,
    pub position: Position,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Parent → child link, derived from `Node::parent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// `"<source>-<target>"`
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source: source.clone(),
            target: target.clone(),
        }
    }
}

/// Node and edge counts. A change in either is a topology change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Topology {
    pub nodes: usize,
    pub edges: usize,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.nodes == 0
    }
}

/// Emitted after a mutation changed the node or edge count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyChange {
    pub before: Topology,
    pub after: Topology,
}
