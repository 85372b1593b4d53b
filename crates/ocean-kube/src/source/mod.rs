//! Sources of cluster config and credentials
//!
//! Each source reads one origin and reports what it found:
//! - **Environment**: fixed environment variables
//! - **ConfigMap**: the controller ConfigMap (cluster config)
//! - **Secret**: the controller Secret (credentials)
//!
//! A source may hand back a usable value *and* an error. Callers must keep
//! the value; the error only describes what went wrong along the way.

mod configmap;
mod env;
mod secret;

pub use configmap::{ConfigMapSource, KEY_ACD_IDENTIFIER, KEY_CLUSTER_IDENTIFIER};
pub use env::{EnvConfigSource, EnvCredentialsSource};
pub use secret::{KEY_ACCOUNT, KEY_TOKEN, SecretSource};

use async_trait::async_trait;
use ocean_core::Resolvable;

use crate::error::{ResolveError, Result};

/// Outcome of consulting a single source
#[derive(Debug)]
pub struct Retrieval<V> {
    /// Whatever the source found, possibly empty
    pub value: V,

    /// Failure encountered while reading, if any
    pub error: Option<ResolveError>,
}

impl<V: Resolvable> Retrieval<V> {
    pub fn ok(value: V) -> Self {
        Self { value, error: None }
    }

    pub fn failed(error: ResolveError) -> Self {
        Self {
            value: V::default(),
            error: Some(error),
        }
    }

    pub fn partial(value: V, error: ResolveError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Strict view: any error fails the retrieval
    pub fn into_result(self) -> Result<V> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.value),
        }
    }
}

/// A single origin of a resolvable value
#[async_trait]
pub trait Source<V: Resolvable>: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &str;

    /// Read the origin
    async fn retrieve(&self) -> Retrieval<V>;
}
