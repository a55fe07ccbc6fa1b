//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod export;
mod session;

pub use export::{ExportService, ExportSummary};
pub use session::{NodeDetails, TopologyListener, TreeSession};
