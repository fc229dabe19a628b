//! Integration tests for unit discovery against a temporary root.

use devmon_core::{async_trait, Check, CheckRun, Severity, Target};
use devmon_plugin_api::{discover, Catalog, DiscoveryError, ModuleFactory, ModuleRegistry};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Switch {
    name: String,
}

impl Target for Switch {
    fn label(&self) -> &str {
        &self.name
    }
}

/// Logs a configured message at a configured severity.
struct Say {
    severity: Severity,
    text: String,
}

#[async_trait]
impl Check<Switch> for Say {
    async fn check(&self, target: &Switch, run: &mut CheckRun) -> anyhow::Result<()> {
        let text = format!("{}: {}", target.name, self.text);
        match self.severity {
            Severity::Failure => run.log_failure(text),
            Severity::Warning => run.log_warning(text),
            Severity::Info => run.log_info(text),
            Severity::Ok => run.log_ok(text),
            Severity::Default => run.log_default(text),
        }
        Ok(())
    }
}

struct SayFactory {
    builds: Arc<AtomicUsize>,
}

impl ModuleFactory<Switch> for SayFactory {
    fn kind(&self) -> &str {
        "say"
    }

    fn validate(&self, params: &toml::Value) -> anyhow::Result<()> {
        let severity = params
            .get("severity")
            .and_then(|v| v.as_str())
            .unwrap_or("ok");
        severity.parse::<Severity>()?;
        Ok(())
    }

    fn build(&self, params: &toml::Value) -> anyhow::Result<Box<dyn Check<Switch>>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let severity = params
            .get("severity")
            .and_then(|v| v.as_str())
            .unwrap_or("ok")
            .parse()?;
        let text = params
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(Box::new(Say { severity, text }))
    }
}

fn registry() -> (ModuleRegistry<Switch>, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let mut registry = ModuleRegistry::new();
    registry
        .register_factory(SayFactory {
            builds: builds.clone(),
        })
        .unwrap();
    (registry, builds)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn two_units_one_with_two_monitors_one_with_none() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "uplinks.toml",
        r#"
        [[monitor]]
        name = "Ping"
        kind = "say"

        [[monitor]]
        name = "Latency"
        kind = "say"
        params = { severity = "warning", text = "slow" }
        "#,
    );
    write(
        dir.path(),
        "helpers.toml",
        r#"
        [plugin]
        description = "Shared helpers, no monitors"
        "#,
    );

    let (registry, _) = registry();
    let monitors = discover(dir.path(), &registry).unwrap();

    let names: Vec<_> = monitors.iter().map(|m| m.full_name()).collect();
    assert_eq!(names, ["uplinks.Latency", "uplinks.Ping"]);
}

#[test]
fn package_units_and_disabled_entries() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "power/monitor.toml",
        r#"
        [[monitor]]
        name = "Psu"
        kind = "say"
        description = "Power supply status"

        [[monitor]]
        name = "Fans"
        kind = "say"
        enabled = false
        "#,
    );

    let (registry, _) = registry();
    let catalog = Catalog::scan(dir.path(), &registry).unwrap();

    assert_eq!(catalog.module_names(), ["power.Psu"]);
    let monitors = catalog.instantiate().unwrap();
    assert_eq!(monitors[0].description(), Some("Power supply status"));
}

#[test]
fn order_is_deterministic_across_scans() {
    let dir = tempfile::tempdir().unwrap();
    for unit in ["zeta", "alpha", "mid"] {
        write(
            dir.path(),
            &format!("{unit}.toml"),
            "[[monitor]]\nname = 'B'\nkind = 'say'\n[[monitor]]\nname = 'A'\nkind = 'say'\n",
        );
    }

    let (registry, _) = registry();
    let first = Catalog::scan(dir.path(), &registry).unwrap().module_names();
    let second = Catalog::scan(dir.path(), &registry).unwrap().module_names();

    assert_eq!(first, second);
    assert_eq!(first[0], "alpha.A");
    assert_eq!(first[5], "zeta.B");
}

#[tokio::test]
async fn instantiate_builds_fresh_monitors_each_time() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "core.toml",
        "[[monitor]]\nname = 'Ping'\nkind = 'say'\nparams = { text = 'up' }\n",
    );

    let (registry, builds) = registry();
    let catalog = Catalog::scan(dir.path(), &registry).unwrap();
    assert_eq!(builds.load(Ordering::SeqCst), 0);

    let first = catalog.instantiate().unwrap();
    let second = catalog.clone().instantiate().unwrap();
    assert_eq!(builds.load(Ordering::SeqCst), 2);

    let device = Switch {
        name: "sw1".to_string(),
    };
    let results = first[0].run(&device).await.unwrap();
    assert_eq!(results.messages_at(Severity::Ok), ["sw1: up"]);
    assert_eq!(second[0].full_name(), first[0].full_name());
}

#[test]
fn broken_unit_fails_the_whole_pass() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.toml", "[[monitor]]\nname = 'Ping'\nkind = 'say'\n");
    write(dir.path(), "broken.toml", "[[monitor]\nname = ");

    let (registry, _) = registry();
    let err = discover(dir.path(), &registry).unwrap_err();

    assert!(matches!(err, DiscoveryError::Parse { .. }));
    assert_eq!(err.subject(), Some("broken"));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn unknown_kind_and_bad_params_name_the_module() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "core.toml", "[[monitor]]\nname = 'Bgp'\nkind = 'bgp'\n");

    let (registry, _) = registry();
    let err = discover(dir.path(), &registry).unwrap_err();
    assert!(matches!(err, DiscoveryError::UnknownKind { ref kind, .. } if kind == "bgp"));
    assert_eq!(err.subject(), Some("core.Bgp"));

    write(
        dir.path(),
        "core.toml",
        "[[monitor]]\nname = 'Ping'\nkind = 'say'\nparams = { severity = 'critical' }\n",
    );
    let err = discover(dir.path(), &registry).unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidParams { .. }));
    assert_eq!(err.subject(), Some("core.Ping"));
}

#[test]
fn empty_root_discovers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry();

    let catalog = Catalog::scan(dir.path(), &registry).unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.root(), dir.path());
}
