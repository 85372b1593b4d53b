//! Typed values schemas, one per chart family
//!
//! Unknown keys are ignored and missing keys default to empty, so any
//! partial override document decodes successfully.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::value::{ClusterConfig, Credentials};

/// Top-level key holding credentials and cluster identity in every chart
pub const SPOTINST_KEY: &str = "spotinst";

/// Components the operator bootstraps when nothing else is requested
pub const DEFAULT_BOOTSTRAP_COMPONENTS: &[&str] = &["ocean-controller"];

/// A chart family's values schema
pub trait ChartValues: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Chart family name
    const CHART: &'static str;

    /// Dotted paths of required leaves that are still empty
    fn missing_fields(&self) -> Vec<&'static str>;

    /// True when every required leaf is set
    fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// The `spotinst` group shared by all chart families
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpotinstValues {
    pub token: String,
    pub account: String,
    pub cluster_identifier: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub acd_identifier: String,
}

impl SpotinstValues {
    pub fn from_resolved(config: &ClusterConfig, credentials: &Credentials) -> Self {
        Self {
            token: credentials.token.clone(),
            account: credentials.account.clone(),
            cluster_identifier: config.cluster_identifier.clone(),
            acd_identifier: config.acd_identifier.clone(),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("spotinst.token", &self.token),
            ("spotinst.account", &self.account),
            ("spotinst.clusterIdentifier", &self.cluster_identifier),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(path, _)| path)
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Values for the ocean-controller chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerValues {
    pub spotinst: SpotinstValues,
}

impl ChartValues for ControllerValues {
    const CHART: &'static str = "ocean-controller";

    fn missing_fields(&self) -> Vec<&'static str> {
        self.spotinst.missing_fields()
    }
}

/// The `bootstrap` group of the operator chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapValues {
    pub components: Vec<String>,
}

impl BootstrapValues {
    pub fn with_defaults() -> Self {
        Self {
            components: DEFAULT_BOOTSTRAP_COMPONENTS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Values for the ocean-operator chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorValues {
    pub spotinst: SpotinstValues,
    pub bootstrap: BootstrapValues,
}

impl ChartValues for OperatorValues {
    const CHART: &'static str = "ocean-operator";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = self.spotinst.missing_fields();
        let components = &self.bootstrap.components;
        if components.is_empty() || components.iter().any(|c| c.is_empty()) {
            missing.push("bootstrap.components");
        }
        missing
    }
}
