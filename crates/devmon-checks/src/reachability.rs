//! Reachability check: does the device answer a ping?

use anyhow::Result;
use async_trait::async_trait;
use devmon_core::{Check, CheckRun};
use devmon_plugin_api::ModuleFactory;
use serde::Deserialize;

use crate::probe::DeviceProbe;

// =============================================================================
// ReachabilityFactory - ModuleFactory implementation
// =============================================================================

/// Parameters of the `reachability` kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReachabilityConfig {
    /// Extra attempts after the first unanswered ping
    #[serde(default)]
    pub retries: u32,
}

/// Factory for the `reachability` kind.
pub struct ReachabilityFactory;

impl<D: DeviceProbe> ModuleFactory<D> for ReachabilityFactory {
    fn kind(&self) -> &str {
        "reachability"
    }

    fn description(&self) -> &str {
        "Device answers ping"
    }

    fn validate(&self, params: &toml::Value) -> Result<()> {
        let _: ReachabilityConfig = params.clone().try_into()?;
        Ok(())
    }

    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>> {
        let config: ReachabilityConfig = params.clone().try_into()?;
        Ok(Box::new(Reachability { config }))
    }
}

// =============================================================================
// Reachability
// =============================================================================

/// Pings the target, retrying as configured.
pub struct Reachability {
    config: ReachabilityConfig,
}

#[async_trait]
impl<D: DeviceProbe> Check<D> for Reachability {
    async fn check(&self, target: &D, run: &mut CheckRun) -> Result<()> {
        let attempts = self.config.retries.saturating_add(1);
        for attempt in 1..=attempts {
            if target.ping().await? {
                if attempt > 1 {
                    run.log_warning(format!("ping succeeded after {} attempts", attempt));
                } else {
                    run.log_ok("ping succeeded");
                }
                return Ok(());
            }
            tracing::debug!(target_device = target.label(), attempt, "ping unanswered");
        }
        run.log_failure(format!("{} is unreachable", target.label()));
        Ok(())
    }
}
