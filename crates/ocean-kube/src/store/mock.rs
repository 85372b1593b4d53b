//! Mock object store for testing
//!
//! Holds ConfigMaps and Secrets in memory, so sources can be exercised
//! without a Kubernetes cluster.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{ObjectKey, ObjectStore, StoredObject};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    ConfigMap,
    Secret,
}

/// In-memory object store for testing
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<RwLock<HashMap<(Kind, ObjectKey), StoredObject>>>,
    failures: Arc<RwLock<HashMap<(Kind, ObjectKey), String>>>,
    counts: Arc<RwLock<StoreCounts>>,
}

/// Counts of reads performed, for test assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreCounts {
    pub config_maps: usize,
    pub secrets: usize,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a ConfigMap
    pub fn with_config_map(self, key: ObjectKey, object: StoredObject) -> Self {
        self.insert(Kind::ConfigMap, key, object);
        self
    }

    /// Store a Secret
    pub fn with_secret(self, key: ObjectKey, object: StoredObject) -> Self {
        self.insert(Kind::Secret, key, object);
        self
    }

    /// Make reads of a ConfigMap fail
    pub fn fail_config_map(self, key: ObjectKey, message: impl Into<String>) -> Self {
        self.fail(Kind::ConfigMap, key, message.into());
        self
    }

    /// Make reads of a Secret fail
    pub fn fail_secret(self, key: ObjectKey, message: impl Into<String>) -> Self {
        self.fail(Kind::Secret, key, message.into());
        self
    }

    /// Get read counts for assertions
    pub fn counts(&self) -> StoreCounts {
        self.counts.read().unwrap().clone()
    }

    fn insert(&self, kind: Kind, key: ObjectKey, object: StoredObject) {
        self.objects.write().unwrap().insert((kind, key), object);
    }

    fn fail(&self, kind: Kind, key: ObjectKey, message: String) {
        self.failures.write().unwrap().insert((kind, key), message);
    }

    fn read(&self, kind: Kind, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        {
            let mut counts = self.counts.write().unwrap();
            match kind {
                Kind::ConfigMap => counts.config_maps += 1,
                Kind::Secret => counts.secrets += 1,
            }
        }

        let lookup = (kind, key.clone());
        if let Some(message) = self.failures.read().unwrap().get(&lookup) {
            return Err(StoreError::Unavailable(message.clone()));
        }

        self.objects
            .read()
            .unwrap()
            .get(&lookup)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn config_map(&self, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        self.read(Kind::ConfigMap, key)
    }

    async fn secret(&self, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        self.read(Kind::Secret, key)
    }
}
