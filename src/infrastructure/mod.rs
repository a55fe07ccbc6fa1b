//! Infrastructure layer: concrete I/O and the service container wiring settings,
//! schema and sessions together.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
