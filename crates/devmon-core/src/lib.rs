//! `devmon-core`
//!
//! Result model and module capability for the devmon health-check framework.
//!
//! ## Key Types
//!
//! - [`Severity`]: ordered message levels with display metadata
//! - [`ResultLog`]: severity-bucketed messages with a monoidal `combine`
//! - [`Check`]: the routine a monitoring plugin implements
//! - [`Monitor`]: a check plus its identity, run once per [`Monitor::run`]
//! - [`ModuleError`]: a module run that did not complete

pub mod error;
pub mod module;
pub mod results;
pub mod severity;

pub use error::{ModuleError, ResultError};
pub use module::{Check, CheckRun, ModuleIdentity, Monitor, Target};
pub use results::{LogSummary, Message, ResultLog};
pub use severity::Severity;

// Re-exported so plugin crates share one version with the trait definitions.
pub use async_trait::async_trait;
