//! Node id generation.

use uuid::Uuid;

use crate::domain::entities::NodeId;

/// Source of candidate node ids. The store rejects candidates that collide with live ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> NodeId;
}

/// Short random lowercase-hex ids derived from UUIDv4.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    /// `length` is clamped to 4..=32 (a simple UUID has 32 hex digits).
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(4, 32),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let raw = Uuid::new_v4().simple().to_string();
        NodeId::new(&raw[..self.length])
    }
}

/// `<prefix>1`, `<prefix>2`, ... for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
