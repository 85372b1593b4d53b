//! Process environment access

use std::collections::HashMap;

/// Cluster identifier variable
pub const ENV_CLUSTER_IDENTIFIER: &str = "SPOTINST_CLUSTER_IDENTIFIER";

/// Account connector identifier variable
pub const ENV_ACD_IDENTIFIER: &str = "SPOTINST_ACD_IDENTIFIER";

/// API token variable, as read by the Spot SDK
pub const ENV_TOKEN: &str = "SPOTINST_TOKEN";

/// Account variable, as read by the Spot SDK
pub const ENV_ACCOUNT: &str = "SPOTINST_ACCOUNT";

/// Lookup of environment variables
pub trait Environment: Send + Sync {
    /// Value of `name`, or an empty string when unset
    fn lookup(&self, name: &str) -> String;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> String {
        std::env::var(name).unwrap_or_default()
    }
}

/// Fixed set of variables, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Environment for MapEnv {
    fn lookup(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }
}
