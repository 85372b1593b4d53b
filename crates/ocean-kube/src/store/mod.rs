//! Object store access for ConfigMaps and Secrets
//!
//! Sources read cluster-stored settings through the `ObjectStore` trait:
//! - **KubeObjectStore**: backed by the Kubernetes API
//! - **MockObjectStore**: in-memory, for tests

mod cluster;
mod mock;

pub use cluster::KubeObjectStore;
pub use mock::{MockObjectStore, StoreCounts};

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::StoreError;

/// Name and namespace of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub name: String,
    pub namespace: String,
}

impl ObjectKey {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Key/value payload of a ConfigMap or Secret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    /// Plain string values
    pub data: BTreeMap<String, String>,

    /// Binary values (decoded Secret data, ConfigMap binaryData)
    pub binary_data: BTreeMap<String, Vec<u8>>,
}

impl StoredObject {
    pub fn with_data<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            binary_data: BTreeMap::new(),
        }
    }

    pub fn with_binary<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        self.binary_data
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Plain and binary values in one map; binary values win on overlap
    ///
    /// Binary values that are not UTF-8 are skipped, leaving any plain value
    /// under the same key in place.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.data.clone();
        for (key, bytes) in &self.binary_data {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    merged.insert(key.clone(), text.to_string());
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping non-UTF-8 binary value");
                }
            }
        }
        merged
    }
}

/// Read access to namespaced key/value objects
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch a ConfigMap
    async fn config_map(&self, key: &ObjectKey) -> Result<StoredObject, StoreError>;

    /// Fetch a Secret
    async fn secret(&self, key: &ObjectKey) -> Result<StoredObject, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_binary_wins() {
        let object = StoredObject::with_data([("token", "plain"), ("account", "act-1")])
            .with_binary([("token", b"binary".to_vec())]);

        let merged = object.merged();
        assert_eq!(merged.get("token").map(String::as_str), Some("binary"));
        assert_eq!(merged.get("account").map(String::as_str), Some("act-1"));
    }

    #[test]
    fn test_merged_skips_non_utf8_binary() {
        let object = StoredObject::with_data([("token", "plain")])
            .with_binary([("token", vec![0xff, 0xfe]), ("account", vec![0xc3, 0x28])]);

        let merged = object.merged();
        assert_eq!(merged.get("token").map(String::as_str), Some("plain"));
        assert!(!merged.contains_key("account"));
    }

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::new("cfg", "kube-system").to_string(), "kube-system/cfg");
    }
}
