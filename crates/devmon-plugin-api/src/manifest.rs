//! Unit manifest format.
//!
//! An installable unit is a TOML file declaring zero or more monitors. The
//! unit's file stem (or directory name, for `<name>/monitor.toml`) becomes the
//! module name of every monitor it declares.
//!
//! ```toml
//! [plugin]
//! description = "Core network reachability checks"
//! version = "1.2.0"
//!
//! [[monitor]]
//! name = "Ping"
//! kind = "reachability"
//!
//! [[monitor]]
//! name = "Latency"
//! kind = "latency"
//! description = "Round-trip time against thresholds"
//! params = { warning_ms = 50, failure_ms = 250 }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parsed contents of one unit file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UnitManifest {
    /// Descriptive `[plugin]` table
    #[serde(default)]
    pub plugin: PluginInfo,
    /// `[[monitor]]` entries in file order
    #[serde(default, rename = "monitor")]
    pub monitors: Vec<MonitorEntry>,
}

/// Optional descriptive metadata about a unit.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginInfo {
    /// Free-form description
    pub description: Option<String>,
    /// Unit version, reported in logs
    pub version: Option<String>,
}

/// One monitor declared by a unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorEntry {
    /// Monitor name, unique within the unit
    pub name: String,
    /// Registered factory kind that builds this monitor
    pub kind: String,
    /// Free-form description
    pub description: Option<String>,
    /// Disabled entries are skipped by discovery
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Free-form parameters handed to the factory
    #[serde(default = "default_params")]
    pub params: toml::Value,
}

fn default_enabled() -> bool {
    true
}

fn default_params() -> toml::Value {
    toml::Value::Table(toml::map::Map::new())
}

impl UnitManifest {
    /// Parse manifest TOML.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Monitors that have not been switched off.
    pub fn enabled_monitors(&self) -> impl Iterator<Item = &MonitorEntry> {
        self.monitors.iter().filter(|m| m.enabled)
    }

    /// Check names and kinds beyond what parsing enforces.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        for monitor in &self.monitors {
            validate_name(&monitor.name)
                .map_err(|e| format!("monitor name '{}' {}", monitor.name, e))?;
            if monitor.kind.trim().is_empty() {
                return Err(format!("monitor '{}' has an empty kind", monitor.name));
            }
            if !monitor.params.is_table() {
                return Err(format!("params of monitor '{}' must be a table", monitor.name));
            }
            if !names.insert(monitor.name.as_str()) {
                return Err(format!("duplicate monitor name: {}", monitor.name));
            }
        }
        Ok(())
    }
}

/// Module and monitor names form dot-joined qualified names, so they may not
/// be empty or contain dots or whitespace.
pub(crate) fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("is empty");
    }
    if name.contains('.') {
        return Err("contains '.'");
    }
    if name.chars().any(char::is_whitespace) {
        return Err("contains whitespace");
    }
    Ok(())
}
