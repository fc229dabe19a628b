//! Registration and discovery errors.
//!
//! Every discovery error fails the whole pass. Variants name the offending
//! unit or qualified module so a misconfigured plugin can be found quickly.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while populating a [`ModuleRegistry`](crate::ModuleRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A factory for this kind is already registered.
    #[error("A factory for module kind '{0}' is already registered")]
    DuplicateKind(String),
}

/// Error raised while scanning a discovery root or instantiating its modules.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The discovery root itself could not be listed.
    #[error("Cannot read discovery root {}: {source}", path.display())]
    Root {
        /// Root that was scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A unit manifest could not be read.
    #[error("Cannot read unit '{unit}' at {}: {source}", path.display())]
    Read {
        /// Unit name
        unit: String,
        /// Manifest path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A unit manifest is not valid TOML or does not match the manifest shape.
    #[error("Failed to load unit '{unit}': {source}")]
    Parse {
        /// Unit name
        unit: String,
        /// TOML error with location
        #[source]
        source: toml::de::Error,
    },

    /// A unit manifest parsed but is semantically invalid.
    #[error("Invalid unit '{unit}': {reason}")]
    InvalidManifest {
        /// Unit name
        unit: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two units resolve to the same module name.
    #[error("Unit '{unit}' is provided more than once")]
    DuplicateUnit {
        /// Unit name
        unit: String,
    },

    /// A monitor entry names a kind nobody registered.
    #[error("Module '{module}' uses unknown kind '{kind}'")]
    UnknownKind {
        /// Qualified module name
        module: String,
        /// Kind named in the manifest
        kind: String,
    },

    /// The factory rejected a monitor entry's parameters.
    #[error("Module '{module}' has invalid params: {source:#}")]
    InvalidParams {
        /// Qualified module name
        module: String,
        /// Validation error from the factory
        #[source]
        source: anyhow::Error,
    },

    /// Two monitor entries share one qualified name.
    #[error("Module '{module}' is defined more than once")]
    DuplicateModule {
        /// Qualified module name
        module: String,
    },

    /// The factory failed to construct a validated module.
    #[error("Failed to build module '{module}': {source:#}")]
    Build {
        /// Qualified module name
        module: String,
        /// Error from the factory
        #[source]
        source: anyhow::Error,
    },
}

impl DiscoveryError {
    /// The unit or qualified module name the error is about, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            DiscoveryError::Root { .. } => None,
            DiscoveryError::Read { unit, .. }
            | DiscoveryError::Parse { unit, .. }
            | DiscoveryError::InvalidManifest { unit, .. }
            | DiscoveryError::DuplicateUnit { unit } => Some(unit),
            DiscoveryError::UnknownKind { module, .. }
            | DiscoveryError::InvalidParams { module, .. }
            | DiscoveryError::DuplicateModule { module }
            | DiscoveryError::Build { module, .. } => Some(module),
        }
    }
}
