//! Module factory trait and registry.
//!
//! Monitoring plugins are compiled into the host and registered explicitly at
//! startup. Discovery then resolves the `kind` named by each unit manifest
//! entry against this registry.
//!
//! ```text
//! composition root
//!   registry.register_factory(ReachabilityFactory)?
//!   registry.register_fn("static", |params| ...)?
//!         │
//!         ▼
//! ModuleRegistry { kind -> Arc<dyn ModuleFactory> }
//!         │  Catalog::scan(root, &registry)
//!         ▼
//! ModuleFactory::build(params) -> Box<dyn Check<D>>
//! ```

use anyhow::Result;
use devmon_core::{Check, Target};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RegistryError;

/// Builds check instances of one kind from manifest parameters.
///
/// Factories live for the program's lifetime and may be asked to build from
/// any task, so they must not hold mutable state across builds.
pub trait ModuleFactory<D: Target>: Send + Sync + 'static {
    /// Kind name matching the manifest `kind` field.
    fn kind(&self) -> &str;

    /// Human-readable summary for listings and error messages.
    fn description(&self) -> &str {
        ""
    }

    /// Check parameters without building.
    ///
    /// Called once per manifest entry during discovery so bad parameters
    /// surface before any module runs.
    fn validate(&self, params: &toml::Value) -> Result<()>;

    /// Build a fresh check instance from validated parameters.
    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>>;
}

/// Factory backed by a closure, for kinds that need no dedicated type.
struct FnFactory<F> {
    kind: String,
    build: F,
}

impl<D, F> ModuleFactory<D> for FnFactory<F>
where
    D: Target,
    F: Fn(&toml::Value) -> Result<Box<dyn Check<D>>> + Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn validate(&self, params: &toml::Value) -> Result<()> {
        (self.build)(params).map(|_| ())
    }

    fn build(&self, params: &toml::Value) -> Result<Box<dyn Check<D>>> {
        (self.build)(params)
    }
}

/// Mapping from module kind to factory.
pub struct ModuleRegistry<D: Target> {
    factories: BTreeMap<String, Arc<dyn ModuleFactory<D>>>,
}

impl<D: Target> Default for ModuleRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Target> ModuleRegistry<D> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory under its [`ModuleFactory::kind`].
    pub fn register_factory(
        &mut self,
        factory: impl ModuleFactory<D>,
    ) -> Result<(), RegistryError> {
        let kind = factory.kind().to_string();
        if self.factories.contains_key(&kind) {
            return Err(RegistryError::DuplicateKind(kind));
        }
        tracing::debug!(kind = %kind, "registered module factory");
        self.factories.insert(kind, Arc::new(factory));
        Ok(())
    }

    /// Register a closure as the factory for `kind`.
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, build: F) -> Result<(), RegistryError>
    where
        F: Fn(&toml::Value) -> Result<Box<dyn Check<D>>> + Send + Sync + 'static,
    {
        self.register_factory(FnFactory {
            kind: kind.into(),
            build,
        })
    }

    /// Factory registered for `kind`.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn ModuleFactory<D>>> {
        self.factories.get(kind).cloned()
    }

    /// Whether `kind` has a factory.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<D: Target> std::fmt::Debug for ModuleRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devmon_core::{async_trait, CheckRun};

    struct Host;

    impl Target for Host {
        fn label(&self) -> &str {
            "host"
        }
    }

    struct Noop;

    #[async_trait]
    impl Check<Host> for Noop {
        async fn check(&self, _target: &Host, run: &mut CheckRun) -> anyhow::Result<()> {
            run.log_ok("");
            Ok(())
        }
    }

    struct NoopFactory;

    impl ModuleFactory<Host> for NoopFactory {
        fn kind(&self) -> &str {
            "noop"
        }

        fn description(&self) -> &str {
            "Does nothing"
        }

        fn validate(&self, _params: &toml::Value) -> Result<()> {
            Ok(())
        }

        fn build(&self, _params: &toml::Value) -> Result<Box<dyn Check<Host>>> {
            Ok(Box::new(Noop))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ModuleRegistry::<Host>::new();
        assert!(registry.is_empty());

        registry.register_factory(NoopFactory).unwrap();
        registry
            .register_fn("alias", |_| Ok(Box::new(Noop) as Box<dyn Check<Host>>))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("noop"));
        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["alias", "noop"]);
        assert_eq!(registry.get("noop").unwrap().description(), "Does nothing");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = ModuleRegistry::<Host>::new();
        registry.register_factory(NoopFactory).unwrap();

        let err = registry.register_factory(NoopFactory).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKind("noop".to_string()));
    }

    #[test]
    fn test_fn_factory_validate_uses_build() {
        let mut registry = ModuleRegistry::<Host>::new();
        registry
            .register_fn("picky", |params| {
                if params.get("target").is_none() {
                    anyhow::bail!("missing 'target'");
                }
                Ok(Box::new(Noop) as Box<dyn Check<Host>>)
            })
            .unwrap();

        let factory = registry.get("picky").unwrap();
        let empty = toml::Value::Table(toml::map::Map::new());
        assert!(factory.validate(&empty).is_err());

        let params: toml::Value = toml::from_str("target = 'x'").unwrap();
        assert!(factory.validate(&params).is_ok());
    }
}
