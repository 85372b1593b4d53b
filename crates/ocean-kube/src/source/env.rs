//! Environment variable sources

use async_trait::async_trait;
use ocean_core::{ClusterConfig, Credentials, Resolvable};
use std::sync::Arc;

use super::{Retrieval, Source};
use crate::env::{
    ENV_ACCOUNT, ENV_ACD_IDENTIFIER, ENV_CLUSTER_IDENTIFIER, ENV_TOKEN, Environment,
};
use crate::error::ResolveError;

/// Reads cluster config from the environment. Never fails.
#[derive(Clone)]
pub struct EnvConfigSource {
    env: Arc<dyn Environment>,
}

impl EnvConfigSource {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Source<ClusterConfig> for EnvConfigSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn retrieve(&self) -> Retrieval<ClusterConfig> {
        Retrieval::ok(ClusterConfig {
            cluster_identifier: self.env.lookup(ENV_CLUSTER_IDENTIFIER),
            acd_identifier: self.env.lookup(ENV_ACD_IDENTIFIER),
        })
    }
}

/// Reads credentials from the Spot SDK environment variables
///
/// Returns `NotFound` alongside the empty value when neither variable is set.
#[derive(Clone)]
pub struct EnvCredentialsSource {
    env: Arc<dyn Environment>,
}

impl EnvCredentialsSource {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Source<Credentials> for EnvCredentialsSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn retrieve(&self) -> Retrieval<Credentials> {
        let credentials = Credentials {
            token: self.env.lookup(ENV_TOKEN),
            account: self.env.lookup(ENV_ACCOUNT),
        };

        if credentials.is_empty() {
            return Retrieval::partial(
                credentials,
                ResolveError::not_found::<Credentials>(self.name()),
            );
        }
        Retrieval::ok(credentials)
    }
}
