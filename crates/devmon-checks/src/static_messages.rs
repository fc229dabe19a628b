//! Check that logs a fixed list of messages.
//!
//! Useful for smoke-testing a deployment's discovery root and for pinning
//! operator notes onto every device report.
//!
//! ```toml
//! [[monitor]]
//! name = "Maintenance"
//! kind = "static"
//! params.messages = [
//!     { severity = "info", text = "scheduled maintenance on Friday" },
//! ]
//! ```

use anyhow::Result;
use async_trait::async_trait;
use devmon_core::{Check, CheckRun, Message, Severity, Target};
use devmon_plugin_api::ModuleFactory;
use serde::Deserialize;

/// Parameters of the `static` kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticConfig {
    /// Messages logged on every run, in order
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Factory for the `static` kind.
pub struct StaticFactory;

impl<D: Target> ModuleFactory<D> for StaticFactory {
    fn kind(&self) -> &str {
        "static"
    }

    fn description(&self) -> &str {
        "Logs configured messages"
    }

    fn validate(&self, params: &toml::Value) -> Result<()> {
        let _: StaticConfig = params.clone().try_into()?;
        Ok(())
    }

    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>> {
        let config: StaticConfig = params.clone().try_into()?;
        Ok(Box::new(StaticMessages {
            messages: config.messages,
        }))
    }
}

/// Logs a fixed list of messages.
pub struct StaticMessages {
    messages: Vec<Message>,
}

impl StaticMessages {
    /// Check that logs `messages` on every run.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl<D: Target> Check<D> for StaticMessages {
    async fn check(&self, _target: &D, run: &mut CheckRun) -> Result<()> {
        for message in &self.messages {
            let text = message.text.clone();
            match message.severity {
                Severity::Default => run.log_default(text),
                Severity::Ok => run.log_ok(text),
                Severity::Info => run.log_info(text),
                Severity::Warning => run.log_warning(text),
                Severity::Failure => run.log_failure(text),
            }
        }
        Ok(())
    }
}
