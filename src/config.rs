//! Host settings loaded with Figment.
//!
//! Settings come from a TOML file merged with environment variables prefixed
//! with `DEVMON_`. Nested keys are separated by a double underscore, so
//! `DEVMON_MONITORING__POLICY=best_effort` overrides `monitoring.policy`.
//!
//! ```toml
//! [monitoring]
//! root = "/etc/devmon/monitoring"
//! policy = "best_effort"
//! module_timeout = "5s"
//! max_in_flight = 4
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregator::FailurePolicy;
use crate::error::ConfigError;
use crate::telemetry::{parse_log_level, OutputFormat};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "DEVMON_";

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Discovery root and pass options
    pub monitoring: MonitoringSettings,
    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where modules live and how a pass runs them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSettings {
    /// Discovery root holding unit manifests
    pub root: PathBuf,
    /// What a pass does when a module errors
    #[serde(default)]
    pub policy: FailurePolicy,
    /// Upper bound on a single module run, e.g. `"750ms"` or `"5s"`
    #[serde(default, with = "humantime_serde")]
    pub module_timeout: Option<Duration>,
    /// Modules allowed to run at once; 1 runs them one after another
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

/// Tracing output options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Line format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: OutputFormat::default(),
        }
    }
}

fn default_max_in_flight() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Settings for `root` with every other key at its default.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            monitoring: MonitoringSettings {
                root: root.into(),
                policy: FailurePolicy::default(),
                module_timeout: None,
                max_in_flight: default_max_in_flight(),
            },
            logging: LoggingSettings::default(),
        }
    }

    /// Load from a TOML file plus `DEVMON_` environment overrides, then
    /// validate.
    ///
    /// A missing file is not an error as long as the environment supplies
    /// the required keys.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_log_level(&self.logging.level).map_err(ConfigError::Invalid)?;

        if self.monitoring.max_in_flight == 0 {
            return Err(ConfigError::Invalid(
                "monitoring.max_in_flight must be at least 1".to_string(),
            ));
        }

        if self.monitoring.module_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "monitoring.module_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
