//! Settings file management
//!
//! Stored in `~/.config/ocean/config.yaml`. Every field has a default, so
//! a missing file or a partial one is always usable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ResolveError, Result};
use crate::installer::ChartSpec;
use crate::store::ObjectKey;

pub const DEFAULT_NAMESPACE: &str = "kube-system";
pub const DEFAULT_CONFIG_MAP: &str = "spotinst-kubernetes-cluster-controller-config";
pub const DEFAULT_SECRET: &str = "spotinst-kubernetes-cluster-controller";
pub const DEFAULT_CHART_REPOSITORY: &str = "https://charts.spot.io";

/// Where the object-store sources look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverSettings {
    #[serde(default = "default_config_map")]
    pub config_map: ObjectRef,

    #[serde(default = "default_secret")]
    pub secret: ObjectRef,
}

fn default_config_map() -> ObjectRef {
    ObjectRef::new(DEFAULT_CONFIG_MAP, DEFAULT_NAMESPACE)
}

fn default_secret() -> ObjectRef {
    ObjectRef::new(DEFAULT_SECRET, DEFAULT_NAMESPACE)
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            config_map: default_config_map(),
            secret: default_secret(),
        }
    }
}

/// Reference to a namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl ObjectRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.name, &self.namespace)
    }
}

/// Chart coordinates per component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default = "default_controller_chart")]
    pub controller: ChartSpec,

    #[serde(default = "default_operator_chart")]
    pub operator: ChartSpec,
}

fn default_controller_chart() -> ChartSpec {
    ChartSpec::new("ocean-kubernetes-controller", DEFAULT_CHART_REPOSITORY, "")
}

fn default_operator_chart() -> ChartSpec {
    ChartSpec::new("ocean-operator", DEFAULT_CHART_REPOSITORY, "")
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            controller: default_controller_chart(),
            operator: default_operator_chart(),
        }
    }
}

/// Settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Registered installer to use
    #[serde(default = "default_installer")]
    pub installer: String,

    #[serde(default)]
    pub charts: ChartSettings,
}

fn default_installer() -> String {
    "helm".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            installer: default_installer(),
            charts: ChartSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ResolveError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    /// Get default settings path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ResolveError::InvalidConfig("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("ocean").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.installer, "helm");
        assert_eq!(
            settings.resolver.config_map.key(),
            ObjectKey::new(DEFAULT_CONFIG_MAP, DEFAULT_NAMESPACE)
        );
        assert_eq!(settings.resolver.secret.name, DEFAULT_SECRET);
        assert_eq!(settings.charts.operator.name, "ocean-operator");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "resolver:\n  secret:\n    name: my-creds\ncharts:\n  controller:\n    name: ctrl\n    repository: https://example.com\n    version: 1.2.3\n"
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.resolver.secret, ObjectRef::new("my-creds", DEFAULT_NAMESPACE));
        assert_eq!(settings.resolver.config_map.name, DEFAULT_CONFIG_MAP);
        assert_eq!(settings.charts.controller.version, "1.2.3");
        assert_eq!(settings.charts.operator.name, "ocean-operator");
        assert_eq!(settings.installer, "helm");
    }

    #[test]
    fn test_malformed_file_is_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resolver: [not, a, map]").unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfig);
    }
}
