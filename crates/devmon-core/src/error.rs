//! Error types for the result model and module runs.
//!
//! Two families live here:
//!
//! - [`ResultError`]: misuse of the result model itself (foreign values passed
//!   where a log is expected, unknown severity labels).
//! - [`ModuleError`]: a monitoring module that could not complete its run.
//!   This is distinct from a module *reporting* a failure through
//!   `log_failure`, which is a normal, successful run.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the result model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultError {
    /// A value that is neither a result log nor the empty identity was
    /// offered to a merge.
    #[error("Invalid argument: cannot combine a result log with {0}")]
    InvalidArgument(String),

    /// A severity label that does not name any known level.
    #[error("Unknown severity: '{0}'")]
    UnknownSeverity(String),
}

/// A module run that did not complete.
///
/// Every variant carries the qualified module name so operators can tell
/// which plugin misbehaved.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// The check body returned an error.
    #[error("Module '{module}' failed: {source:#}")]
    Check {
        /// Qualified module name
        module: String,
        /// Error returned by the check
        #[source]
        source: anyhow::Error,
    },

    /// The check did not finish within its allotted time.
    #[error("Module '{module}' timed out after {timeout:?}")]
    TimedOut {
        /// Qualified module name
        module: String,
        /// Limit the run exceeded
        timeout: Duration,
    },
}

impl ModuleError {
    /// Qualified name of the module that failed.
    pub fn module(&self) -> &str {
        match self {
            ModuleError::Check { module, .. } | ModuleError::TimedOut { module, .. } => module,
        }
    }

    /// What went wrong, without the module name.
    pub fn reason(&self) -> String {
        match self {
            ModuleError::Check { source, .. } => format!("{source:#}"),
            ModuleError::TimedOut { timeout, .. } => format!("timed out after {timeout:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_error_names_module() {
        let err = ModuleError::Check {
            module: "net.Ping".to_string(),
            source: anyhow::anyhow!("socket closed"),
        };
        assert_eq!(err.module(), "net.Ping");
        assert_eq!(err.to_string(), "Module 'net.Ping' failed: socket closed");
        assert_eq!(err.reason(), "socket closed");

        let err = ModuleError::TimedOut {
            module: "net.Slow".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.module(), "net.Slow");
        assert!(err.to_string().contains("timed out after 250ms"));
    }
}
