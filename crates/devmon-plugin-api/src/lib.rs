//! Plugin registration and discovery for devmon monitoring modules.
//!
//! Plugins are compiled into the host and register a [`ModuleFactory`] per
//! module kind. Operators install monitors by dropping unit manifests into a
//! discovery root; [`Catalog::scan`] resolves them against the registry.
//!
//! # Architecture
//!
//! ```text
//! ModuleRegistry  ← factories registered at startup
//!       │
//! Catalog::scan(root)  ← unit manifests (*.toml, <name>/monitor.toml)
//!       │
//! Catalog::instantiate()  → Vec<Monitor<D>>, fresh per run
//! ```

pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use error::{DiscoveryError, RegistryError};
pub use loader::{discover, list_units, Catalog, UnitLocation, PACKAGE_MANIFEST};
pub use manifest::{MonitorEntry, PluginInfo, UnitManifest};
pub use registry::{ModuleFactory, ModuleRegistry};

/// Prelude for plugin authors
pub mod prelude {
    pub use crate::registry::{ModuleFactory, ModuleRegistry};
    pub use devmon_core::{async_trait, Check, CheckRun, Monitor, Severity, Target};
}
