//! Secret-backed credentials source

use async_trait::async_trait;
use ocean_core::{Credentials, Resolvable};
use std::sync::Arc;

use super::{Retrieval, Source};
use crate::error::ResolveError;
use crate::store::{ObjectKey, ObjectStore};

pub const KEY_TOKEN: &str = "token";
pub const KEY_ACCOUNT: &str = "account";

/// Reads credentials from a Secret
///
/// String data and decoded binary data are merged before decoding. A Secret
/// without credentials (or no Secret at all) yields `NotFound`.
#[derive(Clone)]
pub struct SecretSource {
    store: Arc<dyn ObjectStore>,
    key: ObjectKey,
}

impl SecretSource {
    pub fn new(store: Arc<dyn ObjectStore>, key: ObjectKey) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }
}

#[async_trait]
impl Source<Credentials> for SecretSource {
    fn name(&self) -> &str {
        "secret"
    }

    async fn retrieve(&self) -> Retrieval<Credentials> {
        let object = match self.store.secret(&self.key).await {
            Ok(object) => object,
            Err(e) if e.is_not_found() => Default::default(),
            Err(e) => {
                return Retrieval::failed(ResolveError::ObjectStore {
                    kind: "Secret",
                    namespace: self.key.namespace.clone(),
                    name: self.key.name.clone(),
                    source: e,
                });
            }
        };

        let data = object.merged();
        let field = |key: &str| data.get(key).cloned().unwrap_or_default();
        let credentials = Credentials {
            token: field(KEY_TOKEN),
            account: field(KEY_ACCOUNT),
        };

        if credentials.is_empty() {
            return Retrieval::partial(
                credentials,
                ResolveError::not_found::<Credentials>(format!("secret {}", self.key)),
            );
        }
        Retrieval::ok(credentials)
    }
}
