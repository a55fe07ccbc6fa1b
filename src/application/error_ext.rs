//! Attaching context to foreign errors on their way into `ApplicationError`.

use std::error::Error;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait ResultContextExt<T> {
    /// Wrap the error as `OperationFailed` with a short description.
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T>;

    /// Like `with_context`, naming the file involved, e.g. `write export: out.json`.
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> ResultContextExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.into(),
            source: Box::new(e),
        })
    }

    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(format!("{}: {}", action, path.display()))
    }
}
