//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{ExportService, TreeSession};
use crate::config::Settings;
use crate::domain::{IdGenerator, NodeTypeRegistry, TreeStore};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings, I/O boundaries and the node type registry.
///
/// The registry is loaded once here and shared by every session.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Node types, fixed for the lifetime of the process
    pub registry: Arc<NodeTypeRegistry>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let registry = Arc::new(load_registry(&settings, fs.as_ref())?);
        let settings = Arc::new(settings);

        Ok(Self {
            settings,
            fs,
            registry,
        })
    }

    /// A fresh, empty editing session using the configured id style.
    pub fn session(&self) -> TreeSession {
        self.session_with_ids(self.settings.ids.generator())
    }

    pub fn session_with_ids(&self, ids: Box<dyn IdGenerator>) -> TreeSession {
        let store = TreeStore::with_id_generator(Arc::clone(&self.registry), ids);
        TreeSession::new(
            store,
            Box::new(self.settings.layout.to_layout()),
            self.settings.layout.direction,
        )
    }

    pub fn export_service(&self) -> ExportService {
        ExportService::new(Arc::clone(&self.fs), self.settings.export.clone())
    }
}

fn load_registry(settings: &Settings, fs: &dyn FileSystem) -> InfraResult<NodeTypeRegistry> {
    let Some(path) = &settings.schema else {
        return Ok(NodeTypeRegistry::builtin());
    };
    debug!("loading node type schema from {}", path.display());
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read schema {}", path.display()), e))?;
    NodeTypeRegistry::from_toml(&content).map_err(|source| InfraError::Schema {
        path: path.clone(),
        source,
    })
}
