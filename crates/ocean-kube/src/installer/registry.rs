//! Named installer factories

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ChartInstaller, HelmInstaller, InstallLog, InstallerConfig};
use crate::error::{ResolveError, Result};

/// Builds an installer for one release
pub type InstallerFactory = Arc<
    dyn Fn(InstallerConfig, Arc<dyn InstallLog>) -> Result<Box<dyn ChartInstaller>> + Send + Sync,
>;

/// Installer factories by name
///
/// Built once at startup and passed where it is needed.
#[derive(Clone, Default)]
pub struct InstallerRegistry {
    factories: BTreeMap<String, InstallerFactory>,
}

impl InstallerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in installers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HelmInstaller::NAME, |config, log| {
            Ok(Box::new(HelmInstaller::new(config, log)) as Box<dyn ChartInstaller>)
        });
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(InstallerConfig, Arc<dyn InstallLog>) -> Result<Box<dyn ChartInstaller>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Instantiate the installer registered under `name`
    pub fn create(
        &self,
        name: &str,
        config: InstallerConfig,
        log: Arc<dyn InstallLog>,
    ) -> Result<Box<dyn ChartInstaller>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            ResolveError::InvalidConfig(format!(
                "unknown installer '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })?;
        factory(config, log)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl std::fmt::Debug for InstallerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallerRegistry")
            .field("installers", &self.names())
            .finish()
    }
}
