//! ConfigMap-backed cluster config source

use async_trait::async_trait;
use ocean_core::ClusterConfig;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Retrieval, Source};
use crate::error::ResolveError;
use crate::store::{ObjectKey, ObjectStore};

pub const KEY_CLUSTER_IDENTIFIER: &str = "spotinst.cluster-identifier";
pub const KEY_ACD_IDENTIFIER: &str = "spotinst.acd-identifier";

/// Reads cluster config from a ConfigMap
///
/// A missing ConfigMap is an empty result, not an error.
#[derive(Clone)]
pub struct ConfigMapSource {
    store: Arc<dyn ObjectStore>,
    key: ObjectKey,
}

impl ConfigMapSource {
    pub fn new(store: Arc<dyn ObjectStore>, key: ObjectKey) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }
}

fn decode(data: &BTreeMap<String, String>) -> ClusterConfig {
    let field = |key: &str| data.get(key).cloned().unwrap_or_default();
    ClusterConfig {
        cluster_identifier: field(KEY_CLUSTER_IDENTIFIER),
        acd_identifier: field(KEY_ACD_IDENTIFIER),
    }
}

#[async_trait]
impl Source<ClusterConfig> for ConfigMapSource {
    fn name(&self) -> &str {
        "configmap"
    }

    async fn retrieve(&self) -> Retrieval<ClusterConfig> {
        match self.store.config_map(&self.key).await {
            Ok(object) => Retrieval::ok(decode(&object.data)),
            Err(e) if e.is_not_found() => Retrieval::ok(ClusterConfig::default()),
            Err(e) => Retrieval::failed(ResolveError::ObjectStore {
                kind: "ConfigMap",
                namespace: self.key.namespace.clone(),
                name: self.key.name.clone(),
                source: e,
            }),
        }
    }
}
