//! Discovery of monitoring modules under a root directory.
//!
//! The root holds installable units, one level deep:
//!
//! ```text
//! <root>/
//! ├── network.toml          unit "network"
//! ├── power/
//! │   └── monitor.toml      unit "power"
//! ├── notes.txt             ignored
//! └── .disabled.toml        ignored (hidden)
//! ```
//!
//! [`Catalog::scan`] loads every unit and resolves each monitor entry against
//! a [`ModuleRegistry`]. The resulting catalog can be cached and asked for
//! fresh [`Monitor`] instances with [`Catalog::instantiate`] before every run.
//! Any unit that fails to load fails the whole scan.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = ModuleRegistry::new();
//! devmon_checks::register_builtin(&mut registry)?;
//!
//! let catalog = Catalog::scan("/etc/devmon/monitoring", &registry)?;
//! for monitor in catalog.instantiate()? {
//!     let results = monitor.run(&device).await?;
//! }
//! ```

use devmon_core::{ModuleIdentity, Monitor, Target};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::DiscoveryError;
use crate::manifest::{validate_name, UnitManifest};
use crate::registry::{ModuleFactory, ModuleRegistry};

/// File name marking a sub-directory as a unit.
pub const PACKAGE_MANIFEST: &str = "monitor.toml";

/// An installable unit found under the discovery root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLocation {
    /// Module name shared by every monitor in the unit
    pub module_name: String,
    /// Path of the unit's manifest file
    pub path: PathBuf,
}

/// Everything needed to build one monitor, resolved at scan time.
struct Blueprint<D: Target> {
    identity: ModuleIdentity,
    description: Option<String>,
    factory: Arc<dyn ModuleFactory<D>>,
    params: toml::Value,
}

/// Cached result of a discovery scan.
///
/// Cloning is cheap; clones share the resolved blueprints.
pub struct Catalog<D: Target> {
    root: PathBuf,
    blueprints: Vec<Arc<Blueprint<D>>>,
}

impl<D: Target> Clone for Catalog<D> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            blueprints: self.blueprints.clone(),
        }
    }
}

impl<D: Target> std::fmt::Debug for Catalog<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("root", &self.root)
            .field("modules", &self.module_names())
            .finish()
    }
}

impl<D: Target> Catalog<D> {
    /// Load every unit under `root` and resolve its monitors.
    pub fn scan(root: impl AsRef<Path>, registry: &ModuleRegistry<D>) -> Result<Self, DiscoveryError> {
        let root = root.as_ref();
        let mut blueprints = Vec::new();
        let mut seen = HashSet::new();

        for unit in list_units(root)? {
            let manifest = load_unit(&unit)?;

            tracing::info!(
                unit = %unit.module_name,
                path = %unit.path.display(),
                version = manifest.plugin.version.as_deref().unwrap_or("-"),
                monitors = manifest.monitors.len(),
                "Loaded monitoring unit"
            );

            for entry in manifest.enabled_monitors() {
                let identity = ModuleIdentity::new(&unit.module_name, &entry.name);
                let full_name = identity.full_name();

                let factory = registry.get(&entry.kind).ok_or_else(|| {
                    DiscoveryError::UnknownKind {
                        module: full_name.clone(),
                        kind: entry.kind.clone(),
                    }
                })?;

                factory
                    .validate(&entry.params)
                    .map_err(|source| DiscoveryError::InvalidParams {
                        module: full_name.clone(),
                        source,
                    })?;

                if !seen.insert(full_name.clone()) {
                    return Err(DiscoveryError::DuplicateModule { module: full_name });
                }

                tracing::debug!(module = %full_name, kind = %entry.kind, "resolved monitor");

                blueprints.push(Arc::new(Blueprint {
                    identity,
                    description: entry.description.clone(),
                    factory,
                    params: entry.params.clone(),
                }));
            }
        }

        blueprints.sort_by(|a, b| a.identity.cmp(&b.identity));

        Ok(Self {
            root: root.to_path_buf(),
            blueprints,
        })
    }

    /// Build a fresh monitor for every resolved entry, in catalog order.
    pub fn instantiate(&self) -> Result<Vec<Monitor<D>>, DiscoveryError> {
        self.blueprints
            .iter()
            .map(|bp| {
                let check = bp
                    .factory
                    .build(&bp.params)
                    .map_err(|source| DiscoveryError::Build {
                        module: bp.identity.full_name(),
                        source,
                    })?;
                let monitor = Monitor::from_boxed(bp.identity.clone(), check);
                Ok(match &bp.description {
                    Some(description) => monitor.with_description(description.clone()),
                    None => monitor,
                })
            })
            .collect()
    }

    /// Directory the catalog was scanned from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Qualified names of the catalogued monitors, in run order.
    pub fn module_names(&self) -> Vec<String> {
        self.blueprints.iter().map(|bp| bp.identity.full_name()).collect()
    }

    /// Number of catalogued monitors.
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    /// Whether the scan found no enabled monitors.
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

/// Scan `root` and return fresh instances of every discovered monitor.
pub fn discover<D: Target>(
    root: impl AsRef<Path>,
    registry: &ModuleRegistry<D>,
) -> Result<Vec<Monitor<D>>, DiscoveryError> {
    Catalog::scan(root, registry)?.instantiate()
}

/// List installable units directly under `root`, sorted by module name.
pub fn list_units(root: &Path) -> Result<Vec<UnitLocation>, DiscoveryError> {
    let root_err = |source| DiscoveryError::Root {
        path: root.to_path_buf(),
        source,
    };

    let mut units = Vec::new();
    for entry in std::fs::read_dir(root).map_err(root_err)? {
        let path = entry.map_err(root_err)?.path();
        if let Some(unit) = unit_at(&path)? {
            units.push(unit);
        }
    }

    units.sort_by(|a, b| a.module_name.cmp(&b.module_name));

    for pair in units.windows(2) {
        if pair[0].module_name == pair[1].module_name {
            return Err(DiscoveryError::DuplicateUnit {
                unit: pair[0].module_name.clone(),
            });
        }
    }

    Ok(units)
}

/// Decide whether `path` is a unit: a `*.toml` file or a directory holding
/// [`PACKAGE_MANIFEST`]. Hidden and underscore-prefixed entries are skipped.
/// A unit whose name is not valid UTF-8 is an error, not a skip.
fn unit_at(path: &Path) -> Result<Option<UnitLocation>, DiscoveryError> {
    let Some(file_name) = path.file_name() else {
        return Ok(None);
    };
    let display_name = file_name.to_string_lossy();
    if display_name.starts_with('.') || display_name.starts_with('_') {
        return Ok(None);
    }

    let (name, manifest) = if path.is_dir() {
        let manifest = path.join(PACKAGE_MANIFEST);
        if !manifest.is_file() {
            return Ok(None);
        }
        (file_name, manifest)
    } else if path.is_file() && path.extension() == Some(OsStr::new("toml")) {
        (path.file_stem().unwrap_or(file_name), path.to_path_buf())
    } else {
        return Ok(None);
    };

    let module_name = name
        .to_str()
        .ok_or_else(|| DiscoveryError::InvalidManifest {
            unit: name.to_string_lossy().into_owned(),
            reason: "unit name is not valid UTF-8".to_string(),
        })?;

    Ok(Some(UnitLocation {
        module_name: module_name.to_string(),
        path: manifest,
    }))
}

fn load_unit(unit: &UnitLocation) -> Result<UnitManifest, DiscoveryError> {
    validate_name(&unit.module_name).map_err(|e| DiscoveryError::InvalidManifest {
        unit: unit.module_name.clone(),
        reason: format!("unit name {}", e),
    })?;

    let content = std::fs::read_to_string(&unit.path).map_err(|source| DiscoveryError::Read {
        unit: unit.module_name.clone(),
        path: unit.path.clone(),
        source,
    })?;

    let manifest = UnitManifest::parse(&content).map_err(|source| DiscoveryError::Parse {
        unit: unit.module_name.clone(),
        source,
    })?;

    manifest
        .validate()
        .map_err(|reason| DiscoveryError::InvalidManifest {
            unit: unit.module_name.clone(),
            reason,
        })?;

    Ok(manifest)
}
