//! Device-communication seam used by the built-in checks.
//!
//! The host application implements [`DeviceProbe`] on its own device type,
//! wiring it to whatever transport it uses (ICMP, SNMP, vendor API). The
//! checks in this crate only ever talk to a device through this trait.

use async_trait::async_trait;
use devmon_core::Target;
use serde::{Deserialize, Serialize};

/// Operational state of one device interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    /// Interface name as the device reports it
    pub name: String,
    /// Administratively enabled
    pub enabled: bool,
    /// Link is up
    pub up: bool,
}

impl InterfaceStatus {
    /// Status for interface `name`.
    pub fn new(name: impl Into<String>, enabled: bool, up: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            up,
        }
    }
}

/// Device operations the built-in checks rely on.
#[async_trait]
pub trait DeviceProbe: Target {
    /// Whether the device answers at all.
    async fn ping(&self) -> anyhow::Result<bool>;

    /// Round-trip time in milliseconds.
    async fn latency_ms(&self) -> anyhow::Result<f64>;

    /// Current status of every interface.
    async fn interfaces(&self) -> anyhow::Result<Vec<InterfaceStatus>>;
}
