//! Shared, cached resolution of cluster config and credentials

use ocean_core::{ClusterConfig, Credentials};
use std::sync::Arc;

use crate::cache::Cache;
use crate::chain::Chain;
use crate::env::Environment;
use crate::error::Result;
use crate::settings::ResolverSettings;
use crate::source::{
    ConfigMapSource, EnvConfigSource, EnvCredentialsSource, SecretSource, Source,
};
use crate::store::ObjectStore;

pub type ConfigCache = Cache<ClusterConfig, Chain<ClusterConfig>>;
pub type CredentialsCache = Cache<Credentials, Chain<Credentials>>;

/// Cached chains for both domains
///
/// The environment always comes first, so an explicit variable beats
/// whatever is stored in the cluster.
pub struct Resolvers {
    config: ConfigCache,
    credentials: CredentialsCache,
}

impl Resolvers {
    /// Environment first, then the cluster objects named in `settings`
    pub fn new(
        env: Arc<dyn Environment>,
        store: Option<Arc<dyn ObjectStore>>,
        settings: &ResolverSettings,
    ) -> Self {
        let mut config_sources: Vec<Arc<dyn Source<ClusterConfig>>> =
            vec![Arc::new(EnvConfigSource::new(env.clone()))];
        let mut credential_sources: Vec<Arc<dyn Source<Credentials>>> =
            vec![Arc::new(EnvCredentialsSource::new(env))];

        if let Some(store) = store {
            config_sources.push(Arc::new(ConfigMapSource::new(
                store.clone(),
                settings.config_map.key(),
            )));
            credential_sources.push(Arc::new(SecretSource::new(store, settings.secret.key())));
        }

        Self::from_chains(Chain::new(config_sources), Chain::new(credential_sources))
    }

    /// Environment only
    pub fn from_env(env: Arc<dyn Environment>) -> Self {
        Self::new(env, None, &ResolverSettings::default())
    }

    /// Custom chains
    pub fn from_chains(config: Chain<ClusterConfig>, credentials: Chain<Credentials>) -> Self {
        Self {
            config: Cache::new(config),
            credentials: Cache::new(credentials),
        }
    }

    pub async fn config(&self) -> Result<ClusterConfig> {
        self.config.get().await
    }

    pub async fn credentials(&self) -> Result<Credentials> {
        self.credentials.get().await
    }

    /// Invalidate both caches
    pub async fn refresh(&self) {
        self.config.refresh().await;
        self.credentials.refresh().await;
    }
}
