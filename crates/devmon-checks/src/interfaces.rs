//! Interface status check: enabled interfaces must have link.

use anyhow::Result;
use async_trait::async_trait;
use devmon_core::{Check, CheckRun};
use devmon_plugin_api::ModuleFactory;
use serde::Deserialize;

use crate::probe::DeviceProbe;

/// Parameters of the `interfaces` kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacesConfig {
    /// Interface names to skip entirely
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Report a down interface as a warning instead of a failure
    #[serde(default)]
    pub down_is_warning: bool,
}

/// Factory for the `interfaces` kind.
pub struct InterfacesFactory;

impl<D: DeviceProbe> ModuleFactory<D> for InterfacesFactory {
    fn kind(&self) -> &str {
        "interfaces"
    }

    fn description(&self) -> &str {
        "Enabled interfaces are up"
    }

    fn validate(&self, params: &toml::Value) -> Result<()> {
        let _: InterfacesConfig = params.clone().try_into()?;
        Ok(())
    }

    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>> {
        let config: InterfacesConfig = params.clone().try_into()?;
        Ok(Box::new(Interfaces { config }))
    }
}

/// Reports interfaces that are enabled but down.
pub struct Interfaces {
    config: InterfacesConfig,
}

#[async_trait]
impl<D: DeviceProbe> Check<D> for Interfaces {
    async fn check(&self, target: &D, run: &mut CheckRun) -> Result<()> {
        let interfaces = target.interfaces().await?;
        if interfaces.is_empty() {
            run.log_info("device reports no interfaces");
            return Ok(());
        }

        let mut healthy = 0usize;
        for iface in interfaces
            .iter()
            .filter(|i| !self.config.ignore.contains(&i.name))
        {
            run.set_active_test(iface.name.as_str());
            if !iface.enabled {
                run.log_default(format!("{} is administratively down", iface.name));
            } else if iface.up {
                healthy += 1;
            } else if self.config.down_is_warning {
                run.log_warning(format!("{} is down", iface.name));
            } else {
                run.log_failure(format!("{} is down", iface.name));
            }
        }

        if !run.failed() {
            run.log_ok(format!("{} interfaces up", healthy));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;
    use devmon_core::Severity;

    async fn run_with(config: InterfacesConfig, device: MockDevice) -> CheckRun {
        let mut run = CheckRun::new();
        Interfaces { config }.check(&device, &mut run).await.unwrap();
        run
    }

    #[tokio::test]
    async fn test_down_interface_fails() {
        let device = MockDevice::new("sw1")
            .with_interface("ge-0/0/1", true, true)
            .with_interface("ge-0/0/2", true, false)
            .with_interface("ge-0/0/3", false, false);

        let run = run_with(InterfacesConfig::default(), device).await;
        let results = run.results();

        assert!(run.failed());
        assert_eq!(results.messages_at(Severity::Failure), ["ge-0/0/2 is down"]);
        assert_eq!(
            results.messages_at(Severity::Default),
            ["ge-0/0/3 is administratively down"]
        );
        assert!(results.messages_at(Severity::Ok).is_empty());
    }

    #[tokio::test]
    async fn test_ignore_and_warning_mode() {
        let device = MockDevice::new("sw2")
            .with_interface("mgmt0", true, false)
            .with_interface("xe-1", true, false)
            .with_interface("xe-2", true, true);
        let config = InterfacesConfig {
            ignore: vec!["mgmt0".to_string()],
            down_is_warning: true,
        };

        let run = run_with(config, device).await;
        let results = run.results();

        assert!(!run.failed());
        assert_eq!(results.messages_at(Severity::Warning), ["xe-1 is down"]);
        assert_eq!(results.messages_at(Severity::Ok), ["1 interfaces up"]);
    }

    #[tokio::test]
    async fn test_no_interfaces_is_informational() {
        let run = run_with(InterfacesConfig::default(), MockDevice::new("bare")).await;
        assert_eq!(
            run.results().worst_message().severity,
            Severity::Info
        );
    }
}
