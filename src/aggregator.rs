//! Runs every discovered module against one target and folds the results.
//!
//! The fold is always performed in discovery order with
//! [`ResultLog::combine`], seeded with [`ResultLog::empty`]. Execution may
//! overlap module runs (see [`Execution`]), but outcomes are consumed in
//! order, so the combined log does not depend on timing.
//!
//! # Failure policy
//!
//! A module that reports a problem through `log_failure` is not an error.
//! A module whose check *returns* an error (or exceeds the configured
//! timeout) is handled by the [`FailurePolicy`]:
//!
//! - [`FailurePolicy::FailFast`]: the error is returned and no log is
//!   produced. Modules still in flight are dropped.
//! - [`FailurePolicy::BestEffort`]: the error becomes a FAILURE message
//!   `"<module>: <reason>"` in that module's slot and the pass continues.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = ModuleRegistry::new();
//! devmon_checks::register_builtin(&mut registry)?;
//!
//! let settings = Settings::load_from("devmon.toml")?;
//! let aggregator = Aggregator::from_settings(&settings, &registry)?;
//!
//! let results = aggregator.run_all(&device).await?;
//! let worst = results.worst_message();
//! println!("{}: {}", worst.description(), worst.text);
//! ```

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Instrument;

use devmon_core::{ModuleError, Monitor, ResultLog, Severity, Target};
use devmon_plugin_api::{Catalog, ModuleRegistry};

use crate::config::Settings;
use crate::error::AggregateError;

/// What a pass does when a module run errors or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the pass with the first module error.
    #[default]
    FailFast,
    /// Record the error as a FAILURE message and keep going.
    BestEffort,
}

/// How module runs are scheduled within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// One module at a time.
    #[default]
    Sequential,
    /// Up to `max_in_flight` module runs overlap on the calling task.
    Concurrent {
        /// Maximum number of runs in flight
        max_in_flight: usize,
    },
}

impl Execution {
    /// Build from a limit where 1 (or 0) means sequential.
    pub fn with_limit(max_in_flight: usize) -> Self {
        if max_in_flight <= 1 {
            Execution::Sequential
        } else {
            Execution::Concurrent { max_in_flight }
        }
    }

    fn limit(self) -> usize {
        match self {
            Execution::Sequential => 1,
            Execution::Concurrent { max_in_flight } => max_in_flight.max(1),
        }
    }
}

enum ModuleSource<D: Target> {
    /// Fresh monitors are built from the catalog for every pass.
    Catalog(Catalog<D>),
    Fixed(Vec<Monitor<D>>),
}

/// Drives a monitoring pass over one target.
pub struct Aggregator<D: Target> {
    source: ModuleSource<D>,
    policy: FailurePolicy,
    execution: Execution,
    module_timeout: Option<Duration>,
}

impl<D: Target> std::fmt::Debug for Aggregator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("modules", &self.modules())
            .field("policy", &self.policy)
            .field("execution", &self.execution)
            .field("module_timeout", &self.module_timeout)
            .finish()
    }
}

impl<D: Target> Aggregator<D> {
    /// Aggregate over a discovery catalog.
    pub fn new(catalog: Catalog<D>) -> Self {
        Self::from_source(ModuleSource::Catalog(catalog))
    }

    /// Aggregate over an already-built list of monitors, run in list order.
    pub fn with_monitors(monitors: Vec<Monitor<D>>) -> Self {
        Self::from_source(ModuleSource::Fixed(monitors))
    }

    fn from_source(source: ModuleSource<D>) -> Self {
        Self {
            source,
            policy: FailurePolicy::default(),
            execution: Execution::default(),
            module_timeout: None,
        }
    }

    /// Scan `settings.monitoring.root` and apply the pass options.
    pub fn from_settings(
        settings: &Settings,
        registry: &ModuleRegistry<D>,
    ) -> Result<Self, AggregateError> {
        let monitoring = &settings.monitoring;
        let catalog = Catalog::scan(&monitoring.root, registry)?;

        let mut aggregator = Self::new(catalog)
            .with_policy(monitoring.policy)
            .with_execution(Execution::with_limit(monitoring.max_in_flight));
        if let Some(timeout) = monitoring.module_timeout {
            aggregator = aggregator.with_module_timeout(timeout);
        }
        Ok(aggregator)
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set how module runs are scheduled.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Bound every module run; an expired run counts as a module error.
    pub fn with_module_timeout(mut self, timeout: Duration) -> Self {
        self.module_timeout = Some(timeout);
        self
    }

    /// Current failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Qualified names of the modules a pass runs, in fold order.
    pub fn modules(&self) -> Vec<String> {
        match &self.source {
            ModuleSource::Catalog(catalog) => catalog.module_names(),
            ModuleSource::Fixed(monitors) => monitors.iter().map(Monitor::full_name).collect(),
        }
    }

    /// Run every module against `target` and combine their logs.
    pub async fn run_all(&self, target: &D) -> Result<ResultLog, AggregateError> {
        let fresh;
        let monitors: &[Monitor<D>] = match &self.source {
            ModuleSource::Catalog(catalog) => {
                fresh = catalog.instantiate()?;
                &fresh
            }
            ModuleSource::Fixed(monitors) => monitors,
        };

        let span = tracing::info_span!(
            "run_all",
            target = target.label(),
            modules = monitors.len(),
            policy = ?self.policy,
        );

        async move {
            let mut outcomes = stream::iter(monitors)
                .map(|monitor| self.run_one(monitor, target))
                .buffered(self.execution.limit());

            let mut combined = ResultLog::empty();
            while let Some(outcome) = outcomes.next().await {
                match outcome {
                    Ok(log) => {
                        combined.combine(log);
                    }
                    Err(err) => match self.policy {
                        FailurePolicy::FailFast => return Err(AggregateError::Module(err)),
                        FailurePolicy::BestEffort => {
                            tracing::warn!(
                                module = %err.module(),
                                error = %err,
                                "module error recorded as failure"
                            );
                            combined.combine(failure_log(&err));
                        }
                    },
                }
            }

            tracing::info!(
                worst = %combined.worst_severity().unwrap_or(Severity::Default),
                messages = combined.len(),
                "monitoring pass complete"
            );
            Ok(combined)
        }
        .instrument(span)
        .await
    }

    async fn run_one(&self, monitor: &Monitor<D>, target: &D) -> Result<ResultLog, ModuleError> {
        match self.module_timeout {
            Some(timeout) => tokio::time::timeout(timeout, monitor.run(target))
                .await
                .map_err(|_| ModuleError::TimedOut {
                    module: monitor.full_name(),
                    timeout,
                })?,
            None => monitor.run(target).await,
        }
    }
}

fn failure_log(err: &ModuleError) -> ResultLog {
    let mut log = ResultLog::empty();
    log.log(Severity::Failure, format!("{}: {}", err.module(), err.reason()));
    log
}
