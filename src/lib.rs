//! # devmon
//!
//! Pluggable per-device health monitoring. A host discovers monitoring
//! modules from a directory of unit manifests, runs each against a target
//! device and folds the results into one severity-bucketed [`ResultLog`].
//!
//! ## Crate Structure
//!
//! - [`devmon_core`]: severity model, [`ResultLog`], and the [`Check`] /
//!   [`Monitor`] module capability.
//! - [`devmon_plugin_api`]: the [`ModuleRegistry`] of factories and
//!   directory discovery through [`Catalog`].
//! - [`devmon_checks`]: built-in modules for devices that implement
//!   [`DeviceProbe`].
//! - this crate: the [`Aggregator`], [`config::Settings`] and
//!   [`telemetry`] setup.
//!
//! ## Example
//!
//! ```rust,ignore
//! use devmon::{config::Settings, telemetry, Aggregator, ModuleRegistry};
//!
//! let settings = Settings::load_from("devmon.toml")?;
//! telemetry::init_from_settings(&settings)?;
//!
//! let mut registry = ModuleRegistry::new();
//! devmon::devmon_checks::register_builtin(&mut registry)?;
//!
//! let aggregator = Aggregator::from_settings(&settings, &registry)?;
//! let results = aggregator.run_all(&device).await?;
//! for message in results.all_messages() {
//!     println!("{message}");
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod telemetry;

pub use aggregator::{Aggregator, Execution, FailurePolicy};
pub use error::{AggregateError, ConfigError};

pub use devmon_checks::{self, DeviceProbe};
pub use devmon_core::{
    self, async_trait, Check, CheckRun, LogSummary, Message, ModuleError, ModuleIdentity,
    Monitor, ResultError, ResultLog, Severity, Target,
};
pub use devmon_plugin_api::{
    self, discover, Catalog, DiscoveryError, ModuleFactory, ModuleRegistry, RegistryError,
};
