//! Kubernetes-backed object store

use async_trait::async_trait;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Client;
use kube::api::Api;
use std::collections::BTreeMap;

use super::{ObjectKey, ObjectStore, StoredObject};
use crate::error::StoreError;

/// Reads ConfigMaps and Secrets through the Kubernetes API
#[derive(Clone)]
pub struct KubeObjectStore {
    client: Client,
}

impl KubeObjectStore {
    /// Create a store from the default kubeconfig / in-cluster config
    pub async fn try_default() -> Result<Self, StoreError> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    fn config_maps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn bytes(map: Option<BTreeMap<String, ByteString>>) -> BTreeMap<String, Vec<u8>> {
    map.unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.0))
        .collect()
}

#[async_trait]
impl ObjectStore for KubeObjectStore {
    async fn config_map(&self, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        let cm = self.config_maps(&key.namespace).get(&key.name).await?;
        Ok(StoredObject {
            data: cm.data.unwrap_or_default(),
            binary_data: bytes(cm.binary_data),
        })
    }

    async fn secret(&self, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        let secret = self.secrets(&key.namespace).get(&key.name).await?;
        Ok(StoredObject {
            data: secret.string_data.unwrap_or_default(),
            binary_data: bytes(secret.data),
        })
    }
}
