//! Latency check against warning and failure thresholds.

use anyhow::{ensure, Result};
use async_trait::async_trait;
use devmon_core::{Check, CheckRun};
use devmon_plugin_api::ModuleFactory;
use serde::Deserialize;

use crate::probe::DeviceProbe;

/// Parameters of the `latency` kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    /// Round-trip time at or above which a warning is logged
    #[serde(default = "default_warning_ms")]
    pub warning_ms: f64,
    /// Round-trip time at or above which a failure is logged
    #[serde(default = "default_failure_ms")]
    pub failure_ms: f64,
}

fn default_warning_ms() -> f64 {
    100.0
}

fn default_failure_ms() -> f64 {
    500.0
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            warning_ms: default_warning_ms(),
            failure_ms: default_failure_ms(),
        }
    }
}

impl LatencyConfig {
    fn parse(params: &toml::Value) -> Result<Self> {
        let config: LatencyConfig = params.clone().try_into()?;
        ensure!(
            config.warning_ms > 0.0 && config.warning_ms <= config.failure_ms,
            "expected 0 < warning_ms <= failure_ms, got {} and {}",
            config.warning_ms,
            config.failure_ms
        );
        Ok(config)
    }
}

/// Factory for the `latency` kind.
pub struct LatencyFactory;

impl<D: DeviceProbe> ModuleFactory<D> for LatencyFactory {
    fn kind(&self) -> &str {
        "latency"
    }

    fn description(&self) -> &str {
        "Round-trip time within thresholds"
    }

    fn validate(&self, params: &toml::Value) -> Result<()> {
        LatencyConfig::parse(params).map(|_| ())
    }

    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>> {
        Ok(Box::new(Latency {
            config: LatencyConfig::parse(params)?,
        }))
    }
}

/// Compares the device round-trip time against thresholds.
pub struct Latency {
    config: LatencyConfig,
}

#[async_trait]
impl<D: DeviceProbe> Check<D> for Latency {
    async fn check(&self, target: &D, run: &mut CheckRun) -> Result<()> {
        let rtt = target.latency_ms().await?;
        ensure!(
            rtt.is_finite() && rtt >= 0.0,
            "{}: invalid round-trip time {}",
            target.label(),
            rtt
        );
        let message = format!("round-trip time {:.1} ms", rtt);

        if rtt >= self.config.failure_ms {
            run.log_failure(message);
        } else if rtt >= self.config.warning_ms {
            run.log_warning(message);
        } else {
            run.log_ok(message);
        }
        Ok(())
    }
}
