//! Application layer: editing sessions and export on top of the domain model.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ResultContextExt;
