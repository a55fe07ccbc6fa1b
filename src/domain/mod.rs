//! Domain layer: tree model and its constraint rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod export;
pub mod ids;
pub mod layout;
pub mod node_type;
pub mod selection;
pub mod store;

pub use entities::{Edge, Node, NodeId, Position, Topology, TopologyChange};
pub use error::{DomainError, DomainResult};
pub use export::{ExportDocument, ExportEdge, ExportMetadata, ExportNode, ExportSerializer};
pub use ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use layout::{Direction, LayeredLayout, LayoutAdapter};
pub use node_type::{NodeType, NodeTypeRegistry, NodeTypeSchema};
pub use selection::SelectionController;
pub use store::{TreeNode, TreeStore};
