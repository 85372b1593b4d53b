//! Chart installer boundary
//!
//! Installers take a finished values document and drive install, upgrade
//! and uninstall of a chart release. Which installer runs is looked up by
//! name in an `InstallerRegistry` built once at startup.

mod helm;
mod log;
mod recording;
mod registry;

pub use helm::HelmInstaller;
pub use log::{InstallLog, TracingLog, VerboseLog};
pub use recording::{InstallerCall, RecordingInstaller};
pub use registry::{InstallerFactory, InstallerRegistry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ResolveError, Result};

/// Chart coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub name: String,

    pub repository: String,

    /// Empty means the latest published version
    #[serde(default)]
    pub version: String,
}

impl ChartSpec {
    pub fn new(
        name: impl Into<String>,
        repository: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            version: version.into(),
        }
    }
}

/// Immutable description of one release to manage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    release: String,
    namespace: String,
    chart: ChartSpec,
    timeout: Option<Duration>,
    dry_run: bool,
}

impl InstallerConfig {
    /// Validate and build a config
    pub fn new(
        release: impl Into<String>,
        namespace: impl Into<String>,
        chart: ChartSpec,
        timeout: Option<Duration>,
        dry_run: bool,
    ) -> Result<Self> {
        let config = Self {
            release: release.into(),
            namespace: namespace.into(),
            chart,
            timeout,
            dry_run,
        };

        let missing = [
            ("release name", config.release.is_empty()),
            ("namespace", config.namespace.is_empty()),
            ("chart name", config.chart.name.is_empty()),
            ("chart repository", config.chart.repository.is_empty()),
        ];
        if let Some((field, _)) = missing.iter().find(|(_, empty)| *empty) {
            return Err(ResolveError::InvalidConfig(format!("{} must not be empty", field)));
        }
        if config.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ResolveError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn chart(&self) -> &ChartSpec {
        &self.chart
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Installs, upgrades and removes a chart release
#[async_trait]
pub trait ChartInstaller: Send + Sync {
    /// Installer name, used in errors and logs
    fn name(&self) -> &str;

    /// Install the release, or upgrade it if it already exists
    async fn install(&self, values: &str) -> Result<()>;

    /// Upgrade an existing release
    async fn upgrade(&self, values: &str) -> Result<()>;

    /// Remove the release
    async fn uninstall(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn chart() -> ChartSpec {
        ChartSpec::new("ocean-operator", "https://charts.spot.io", "")
    }

    #[test]
    fn test_config_accessors() {
        let config = InstallerConfig::new(
            "ocean",
            "spot-system",
            chart(),
            Some(Duration::from_secs(300)),
            true,
        )
        .unwrap();

        assert_eq!(config.release(), "ocean");
        assert_eq!(config.namespace(), "spot-system");
        assert_eq!(config.chart().name, "ocean-operator");
        assert_eq!(config.timeout(), Some(Duration::from_secs(300)));
        assert!(config.dry_run());
    }

    #[test]
    fn test_config_rejects_missing_fields() {
        let err = InstallerConfig::new("", "spot-system", chart(), None, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(err.to_string(), "invalid configuration: release name must not be empty");

        let no_repo = ChartSpec::new("ocean-operator", "", "");
        assert!(InstallerConfig::new("ocean", "spot-system", no_repo, None, false).is_err());
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        assert!(
            InstallerConfig::new("ocean", "spot-system", chart(), Some(Duration::ZERO), false)
                .is_err()
        );
    }
}
