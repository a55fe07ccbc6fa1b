//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodeId;

/// Domain errors represent tree constraint violations.
/// Every variant leaves the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node type: {0}")]
    UnknownType(String),

    #[error("node type cannot be a root: {0}")]
    InvalidRootType(String),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("{parent_type} does not allow {child_type} children")]
    DisallowedChildType {
        parent_type: String,
        child_type: String,
    },

    #[error("invalid node type schema: {0}")]
    InvalidSchema(String),

    #[error("no fresh node id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
