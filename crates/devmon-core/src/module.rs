//! Monitoring module capability.
//!
//! Plugin authors implement [`Check`]; the framework wraps each check in a
//! [`Monitor`] that carries its identity and drives exactly one invocation per
//! [`Monitor::run`].
//!
//! Run-scoped state (the failed flag, the active test label and the result
//! log) lives in a [`CheckRun`] that is created fresh for every run, so a
//! monitor can be reused across targets and runs without leaking state.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use devmon_core::{Check, CheckRun, Monitor, Severity, Target};
//!
//! struct Router {
//!     name: String,
//!     up: bool,
//! }
//!
//! impl Target for Router {
//!     fn label(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl Check<Router> for Ping {
//!     async fn check(&self, target: &Router, run: &mut CheckRun) -> anyhow::Result<()> {
//!         if target.up {
//!             run.log_ok("ping succeeded");
//!         } else {
//!             run.log_failure("unreachable");
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let monitor = Monitor::new("network", "Ping", Ping);
//! let router = Router { name: "edge-1".into(), up: false };
//! let results = monitor.run(&router).await.unwrap();
//! assert_eq!(results.worst_message().severity, Severity::Failure);
//! # });
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::error::ModuleError;
use crate::results::ResultLog;
use crate::severity::Severity;

/// A device (or any entity) monitoring modules run against.
///
/// The framework never looks inside a target; it only uses the label to
/// attribute log output. Targets are `'static` so checks for them can sit
/// behind trait objects in the registry.
pub trait Target: Send + Sync + 'static {
    /// Name used in log output and messages, e.g. a hostname.
    fn label(&self) -> &str;
}

/// The check routine a monitoring module provides.
#[async_trait]
pub trait Check<D: Target>: Send + Sync {
    /// Inspect `target` and report through `run`.
    ///
    /// Reporting a failed condition is done with [`CheckRun::log_failure`] and
    /// `Ok(())`. Returning `Err` means the check itself could not be carried
    /// out.
    async fn check(&self, target: &D, run: &mut CheckRun) -> anyhow::Result<()>;
}

/// Per-run reporting context handed to [`Check::check`].
#[derive(Debug, Default)]
pub struct CheckRun {
    results: ResultLog,
    failed: bool,
    active_test: Option<String>,
}

impl CheckRun {
    /// Fresh context with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a message not associated with a pass/fail outcome. May be empty.
    pub fn log_default(&mut self, message: impl Into<String>) {
        self.results.log(Severity::Default, message);
    }

    /// Record a passing outcome. May be empty; does not clear a failure.
    pub fn log_ok(&mut self, message: impl Into<String>) {
        self.results.log(Severity::Ok, message);
    }

    /// Log an informational message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.results.log(Severity::Info, message);
    }

    /// Log a degraded but non-fatal condition.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.results.log(Severity::Warning, message);
    }

    /// Record a failure and mark this run as failed.
    pub fn log_failure(&mut self, message: impl Into<String>) {
        self.failed = true;
        self.results.log(Severity::Failure, message);
    }

    /// Whether any failure has been logged during this run.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Label the sub-test currently executing inside the check.
    pub fn set_active_test(&mut self, test: impl Into<String>) {
        let test = test.into();
        tracing::debug!(test = %test, "active test");
        self.active_test = Some(test);
    }

    /// Label set by the last [`set_active_test`](Self::set_active_test).
    pub fn active_test(&self) -> Option<&str> {
        self.active_test.as_deref()
    }

    /// Messages logged so far.
    pub fn results(&self) -> &ResultLog {
        &self.results
    }

    /// Consume the context, keeping its log.
    pub fn into_results(self) -> ResultLog {
        self.results
    }
}

/// Identity of a monitoring module: originating unit plus module name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    /// Unit the module was discovered in
    pub module_name: String,
    /// Name of the module within its unit
    pub name: String,
}

impl ModuleIdentity {
    /// Identity `module_name.name`.
    pub fn new(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            name: name.into(),
        }
    }

    /// Dot-joined qualified name, e.g. `network.Ping`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.module_name, self.name)
    }
}

impl std::fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module_name, self.name)
    }
}

/// A runnable monitoring module instance.
pub struct Monitor<D: Target> {
    identity: ModuleIdentity,
    description: Option<String>,
    check: Box<dyn Check<D>>,
}

impl<D: Target> Monitor<D> {
    /// Wrap `check` under the identity `module_name.name`.
    pub fn new(
        module_name: impl Into<String>,
        name: impl Into<String>,
        check: impl Check<D> + 'static,
    ) -> Self {
        Self::from_boxed(ModuleIdentity::new(module_name, name), Box::new(check))
    }

    /// Wrap an already boxed check, as factories produce.
    pub fn from_boxed(identity: ModuleIdentity, check: Box<dyn Check<D>>) -> Self {
        Self {
            identity,
            description: None,
            check,
        }
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Module identity.
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Unit the module was discovered in.
    pub fn module_name(&self) -> &str {
        &self.identity.module_name
    }

    /// Name of the module within its unit.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Qualified name, e.g. `network.Ping`.
    pub fn full_name(&self) -> String {
        self.identity.full_name()
    }

    /// Description from the manifest, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Run the check once against `target` and return what it logged.
    ///
    /// An error from the check body is returned as [`ModuleError::Check`]
    /// tagged with this module's qualified name; it is not turned into a
    /// failure message here.
    pub async fn run(&self, target: &D) -> Result<ResultLog, ModuleError> {
        let full_name = self.full_name();
        let span = tracing::debug_span!("module_run", module = %full_name, target = target.label());

        let mut run = CheckRun::new();
        self.check
            .check(target, &mut run)
            .instrument(span)
            .await
            .map_err(|source| ModuleError::Check {
                module: full_name.clone(),
                source,
            })?;

        tracing::debug!(
            module = %full_name,
            failed = run.failed(),
            messages = run.results().len(),
            "module run complete"
        );

        Ok(run.into_results())
    }
}

impl<D: Target> std::fmt::Debug for Monitor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("identity", &self.identity)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Device(&'static str);

    impl Target for Device {
        fn label(&self) -> &str {
            self.0
        }
    }

    struct Scripted;

    #[async_trait]
    impl Check<Device> for Scripted {
        async fn check(&self, _target: &Device, run: &mut CheckRun) -> anyhow::Result<()> {
            run.log_ok("ping succeeded");
            run.log_warning("high latency");
            run.log_failure("unreachable");
            run.log_ok("");
            Ok(())
        }
    }

    struct Counting(AtomicUsize);

    #[async_trait]
    impl Check<Device> for Counting {
        async fn check(&self, target: &Device, run: &mut CheckRun) -> anyhow::Result<()> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            run.log_info(format!("{} run {}", target.label(), n));
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Check<Device> for Broken {
        async fn check(&self, _target: &Device, run: &mut CheckRun) -> anyhow::Result<()> {
            run.log_info("about to fail");
            anyhow::bail!("driver crashed")
        }
    }

    #[test]
    fn test_check_run_failed_flag() {
        let mut run = CheckRun::new();
        assert!(!run.failed());

        run.log_failure("bad");
        run.log_ok("later ok");
        assert!(run.failed());
        assert_eq!(run.results().messages_at(Severity::Failure), ["bad"]);
    }

    #[test]
    fn test_active_test_label() {
        let mut run = CheckRun::new();
        assert_eq!(run.active_test(), None);
        run.set_active_test("bgp_sessions");
        assert_eq!(run.active_test(), Some("bgp_sessions"));
    }

    #[test]
    fn test_identity_full_name() {
        let monitor = Monitor::new("network", "Ping", Scripted);
        assert_eq!(monitor.module_name(), "network");
        assert_eq!(monitor.name(), "Ping");
        assert_eq!(monitor.full_name(), "network.Ping");
        assert_eq!(monitor.identity().to_string(), "network.Ping");
    }

    #[tokio::test]
    async fn test_run_returns_logged_messages() {
        let monitor = Monitor::new("network", "Ping", Scripted);
        let results = monitor.run(&Device("edge-1")).await.unwrap();

        assert_eq!(results.worst_message().text, "unreachable");
        assert_eq!(results.messages_at(Severity::Ok), ["ping succeeded", ""]);
        assert_eq!(
            results.all_messages()[0].severity,
            Severity::Failure
        );
    }

    #[tokio::test]
    async fn test_runs_do_not_share_state() {
        let monitor = Monitor::new("inventory", "Counter", Counting(AtomicUsize::new(0)));

        let first = monitor.run(&Device("a")).await.unwrap();
        let second = monitor.run(&Device("b")).await.unwrap();

        assert_eq!(first.messages_at(Severity::Info), ["a run 0"]);
        assert_eq!(second.messages_at(Severity::Info), ["b run 1"]);
    }

    #[tokio::test]
    async fn test_check_error_propagates_with_module_name() {
        let monitor = Monitor::new("power", "Psu", Broken);
        let err = monitor.run(&Device("pdu-3")).await.unwrap_err();

        assert_eq!(err.module(), "power.Psu");
        assert!(matches!(err, ModuleError::Check { .. }));
        assert!(err.to_string().contains("driver crashed"));
    }
}
