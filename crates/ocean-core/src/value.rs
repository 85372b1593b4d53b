//! Resolved cluster settings and credentials
//!
//! Both shapes are assembled from several partial sources. Merging is
//! left-biased: a field that is already set is never overwritten, so the
//! first source to provide a field wins.

use serde::{Deserialize, Serialize};

/// A small record of named string fields that can be resolved piecewise
pub trait Resolvable: Clone + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Human-readable name used in error messages
    const KIND: &'static str;

    /// True when the record carries nothing usable
    fn is_empty(&self) -> bool;

    /// True when every required field is set
    fn is_complete(&self) -> bool;

    /// Adopt fields from `other` wherever this record is still empty
    fn merge(&mut self, other: &Self);
}

fn fill(field: &mut String, other: &str) {
    if field.is_empty() && !other.is_empty() {
        *field = other.to_string();
    }
}

/// Cluster identity read from the environment or the controller ConfigMap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Ocean cluster identifier
    #[serde(default)]
    pub cluster_identifier: String,

    /// Account connector (ACD) identifier
    #[serde(default)]
    pub acd_identifier: String,
}

impl ClusterConfig {
    pub fn new(cluster_identifier: impl Into<String>, acd_identifier: impl Into<String>) -> Self {
        Self {
            cluster_identifier: cluster_identifier.into(),
            acd_identifier: acd_identifier.into(),
        }
    }
}

impl Resolvable for ClusterConfig {
    const KIND: &'static str = "cluster config";

    /// The cluster identifier is the primary field: without it the record
    /// is considered empty even if an ACD identifier is present.
    fn is_empty(&self) -> bool {
        self.cluster_identifier.is_empty()
    }

    fn is_complete(&self) -> bool {
        !self.cluster_identifier.is_empty() && !self.acd_identifier.is_empty()
    }

    fn merge(&mut self, other: &Self) {
        fill(&mut self.cluster_identifier, &other.cluster_identifier);
        fill(&mut self.acd_identifier, &other.acd_identifier);
    }
}

/// API credentials for the Spot platform
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub account: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            account: account.into(),
        }
    }
}

// Keep tokens out of debug output and logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_empty() { "" } else { "***" };
        f.debug_struct("Credentials")
            .field("token", &token)
            .field("account", &self.account)
            .finish()
    }
}

impl Resolvable for Credentials {
    const KIND: &'static str = "credentials";

    fn is_empty(&self) -> bool {
        self.token.is_empty() && self.account.is_empty()
    }

    fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.account.is_empty()
    }

    fn merge(&mut self, other: &Self) {
        fill(&mut self.token, &other.token);
        fill(&mut self.account, &other.account);
    }
}
