//! Built-in monitoring modules for devmon.
//!
//! # Available Kinds
//!
//! - `reachability` - [`Reachability`]: device answers ping
//! - `latency` - [`Latency`]: round-trip time against thresholds
//! - `interfaces` - [`Interfaces`]: enabled interfaces have link
//! - `static` - [`StaticMessages`]: logs configured messages
//!
//! The first three talk to the device through [`DeviceProbe`], which the host
//! implements on its own device type. [`MockDevice`] is a simulated
//! implementation for tests and demos.
//!
//! ```rust,ignore
//! use devmon_plugin_api::ModuleRegistry;
//!
//! let mut registry = ModuleRegistry::<MyDevice>::new();
//! devmon_checks::register_builtin(&mut registry)?;
//! ```

pub mod interfaces;
pub mod latency;
pub mod mock;
pub mod probe;
pub mod reachability;
pub mod static_messages;

pub use interfaces::{Interfaces, InterfacesFactory};
pub use latency::{Latency, LatencyFactory};
pub use mock::MockDevice;
pub use probe::{DeviceProbe, InterfaceStatus};
pub use reachability::{Reachability, ReachabilityFactory};
pub use static_messages::{StaticFactory, StaticMessages};

use devmon_plugin_api::{ModuleRegistry, RegistryError};

/// Register every built-in kind.
pub fn register_builtin<D: DeviceProbe>(
    registry: &mut ModuleRegistry<D>,
) -> Result<(), RegistryError> {
    registry.register_factory(ReachabilityFactory)?;
    registry.register_factory(LatencyFactory)?;
    registry.register_factory(InterfacesFactory)?;
    registry.register_factory(StaticFactory)?;
    Ok(())
}
