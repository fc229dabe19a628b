//! Simulated device for tests and demos.
//!
//! All waits use `tokio::time::sleep`, never a blocking sleep, so a slow mock
//! can be used to exercise per-module timeouts.
//!
//! ```rust
//! use devmon_checks::MockDevice;
//! use std::time::Duration;
//!
//! let device = MockDevice::new("edge-1")
//!     .with_latency_ms(120.0)
//!     .with_interface("xe-0/0/0", true, false)
//!     .with_delay(Duration::from_millis(5));
//! ```

use async_trait::async_trait;
use devmon_core::Target;
use std::time::Duration;

use crate::probe::{DeviceProbe, InterfaceStatus};

/// Simulated device for tests and demos.
#[derive(Debug, Clone)]
pub struct MockDevice {
    name: String,
    reachable: bool,
    latency_ms: f64,
    interfaces: Vec<InterfaceStatus>,
    delay: Option<Duration>,
    probe_error: Option<String>,
}

impl MockDevice {
    /// Reachable device with 1ms latency and no interfaces.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reachable: true,
            latency_ms: 1.0,
            interfaces: Vec::new(),
            delay: None,
            probe_error: None,
        }
    }

    /// Pings go unanswered and latency queries fail.
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Round-trip time reported to latency checks.
    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Add an interface to the reported list.
    pub fn with_interface(mut self, name: impl Into<String>, enabled: bool, up: bool) -> Self {
        self.interfaces.push(InterfaceStatus::new(name, enabled, up));
        self
    }

    /// Delay every probe call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every probe call fail with `message`.
    pub fn with_probe_error(mut self, message: impl Into<String>) -> Self {
        self.probe_error = Some(message.into());
        self
    }

    async fn respond(&self) -> anyhow::Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.probe_error {
            Some(message) => Err(anyhow::anyhow!("{}: {}", self.name, message)),
            None => Ok(()),
        }
    }
}

impl Target for MockDevice {
    fn label(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl DeviceProbe for MockDevice {
    async fn ping(&self) -> anyhow::Result<bool> {
        self.respond().await?;
        Ok(self.reachable)
    }

    async fn latency_ms(&self) -> anyhow::Result<f64> {
        self.respond().await?;
        if !self.reachable {
            anyhow::bail!("{}: no reply", self.name);
        }
        Ok(self.latency_ms)
    }

    async fn interfaces(&self) -> anyhow::Result<Vec<InterfaceStatus>> {
        self.respond().await?;
        Ok(self.interfaces.clone())
    }
}
