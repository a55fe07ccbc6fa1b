//! Layout boundary: assigns 2D display positions from nodes and edges.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Edge, Node, NodeId, Position};

/// Rank direction of the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Roots on top
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    /// Roots on the left
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    fn is_vertical(self) -> bool {
        matches!(self, Direction::TopBottom | Direction::BottomTop)
    }

    fn is_reversed(self) -> bool {
        matches!(self, Direction::BottomTop | Direction::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::TopBottom => "TB",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Direction::TopBottom),
            "BT" => Ok(Direction::BottomTop),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            other => Err(format!("unknown layout direction: {other}")),
        }
    }
}

/// Computes positions for a consistent node/edge set.
///
/// Implementations must be pure and deterministic for a given input, and must
/// accept forests (several roots). They do not validate tree invariants.
pub trait LayoutAdapter {
    fn compute_layout(
        &self,
        nodes: &[&Node],
        edges: &[Edge],
        direction: Direction,
    ) -> HashMap<NodeId, Position>;
}

/// Layered tree placement.
///
/// Nodes are ranked by depth. Leaves take consecutive slots across the breadth
/// axis, a parent is centered between its first and last child, and separate
/// roots sit side by side in node order. Returned positions are top-left corners.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredLayout {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbours on the same rank
    pub node_sep: f64,
    /// Gap between ranks
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 80.0,
            node_sep: 100.0,
            rank_sep: 100.0,
            margin_x: 50.0,
            margin_y: 50.0,
        }
    }
}

struct Placement<'a> {
    children: HashMap<&'a NodeId, Vec<&'a NodeId>>,
    placed: HashMap<&'a NodeId, (f64, usize)>,
    next_slot: f64,
}

/// A node whose children are still being placed.
struct Pending<'a> {
    id: &'a NodeId,
    rank: usize,
    kids: Vec<&'a NodeId>,
    next_kid: usize,
}

impl<'a> Placement<'a> {
    /// Reserve a slot for `id` and collect the children not placed yet.
    /// Reserving first makes malformed cyclic input terminate.
    fn enter(&mut self, id: &'a NodeId, rank: usize) -> Pending<'a> {
        self.placed.insert(id, (self.next_slot, rank));
        let kids = self
            .children
            .get(id)
            .map(|k| k.iter().copied().filter(|c| !self.placed.contains_key(c)).collect())
            .unwrap_or_default();
        Pending {
            id,
            rank,
            kids,
            next_kid: 0,
        }
    }

    /// Place the subtree under `root` in post-order, with an explicit stack so
    /// depth is bounded by memory, not by the call stack.
    fn place(&mut self, root: &'a NodeId) {
        if self.placed.contains_key(root) {
            return;
        }
        let mut stack = vec![self.enter(root, 0)];

        while let Some(top) = stack.last_mut() {
            if let Some(&kid) = top.kids.get(top.next_kid) {
                top.next_kid += 1;
                let rank = top.rank + 1;
                if !self.placed.contains_key(kid) {
                    let pending = self.enter(kid, rank);
                    stack.push(pending);
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let slot_of = |id: &NodeId| self.placed.get(id).map(|&(slot, _)| slot);
            let slot = match (done.kids.first(), done.kids.last()) {
                (Some(first), Some(last)) => {
                    let first = slot_of(first).unwrap_or(0.0);
                    let last = slot_of(last).unwrap_or(first);
                    (first + last) / 2.0
                }
                _ => {
                    let slot = self.next_slot;
                    self.next_slot += 1.0;
                    slot
                }
            };
            self.placed.insert(done.id, (slot, done.rank));
        }
    }
}

impl LayoutAdapter for LayeredLayout {
    fn compute_layout(
        &self,
        nodes: &[&Node],
        edges: &[Edge],
        direction: Direction,
    ) -> HashMap<NodeId, Position> {
        let known: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();

        let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        let mut has_parent: HashSet<&NodeId> = HashSet::new();
        for edge in edges {
            if known.contains(&edge.source) && known.contains(&edge.target) {
                children.entry(&edge.source).or_default().push(&edge.target);
                has_parent.insert(&edge.target);
            }
        }

        let mut placement = Placement {
            children,
            placed: HashMap::with_capacity(nodes.len()),
            next_slot: 0.0,
        };
        for node in nodes.iter().filter(|n| !has_parent.contains(&n.id)) {
            placement.place(&node.id);
        }
        // Anything unreachable from a root (only possible with inconsistent input)
        for node in nodes {
            placement.place(&node.id);
        }

        let max_rank = placement.placed.values().map(|&(_, r)| r).max().unwrap_or(0);
        let (breadth_size, rank_size) = if direction.is_vertical() {
            (self.node_width, self.node_height)
        } else {
            (self.node_height, self.node_width)
        };

        placement
            .placed
            .into_iter()
            .map(|(id, (slot, rank))| {
                let rank = if direction.is_reversed() { max_rank - rank } else { rank };
                let breadth = slot * (breadth_size + self.node_sep);
                let depth = rank as f64 * (rank_size + self.rank_sep);
                let position = if direction.is_vertical() {
                    Position::new(self.margin_x + breadth, self.margin_y + depth)
                } else {
                    Position::new(self.margin_x + depth, self.margin_y + breadth)
                };
                (id.clone(), position)
            })
            .collect()
    }
}
