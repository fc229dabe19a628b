//! Error types for the host layer.
//!
//! Library crates below this one keep their own error enums
//! ([`ModuleError`], [`DiscoveryError`]); [`AggregateError`] wraps them so a
//! caller of [`Aggregator::run_all`](crate::Aggregator::run_all) matches on a
//! single type.

use devmon_core::ModuleError;
use devmon_plugin_api::DiscoveryError;
use thiserror::Error;

/// A full monitoring pass that could not produce a combined log.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// The discovery root could not be scanned or a module could not be built.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A module failed and the failure policy is fail-fast.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl AggregateError {
    /// The unit or qualified module name at fault, when one is known.
    pub fn module(&self) -> Option<&str> {
        match self {
            AggregateError::Discovery(err) => err.subject(),
            AggregateError::Module(err) => Some(err.module()),
        }
    }
}

/// Settings could not be loaded or failed validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or environment could not be read or deserialized.
    #[error("Failed to load settings: {0}")]
    Load(#[from] figment::Error),

    /// Values deserialized but are out of range.
    #[error("Invalid settings: {0}")]
    Invalid(String),

    /// A tracing subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}
