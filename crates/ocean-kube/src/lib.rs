//! Ocean Kube - settings resolution and chart installation for Ocean
//!
//! This crate provides:
//! - **Sources**: Read cluster config and credentials from the environment, ConfigMaps and Secrets
//! - **Chains**: Combine sources in priority order, stopping once a value is complete
//! - **Caching**: Resolve once, share the result, refresh on demand
//! - **Values Builders**: Compute chart values and layer user overrides on top
//! - **Installers**: Drive chart install/upgrade/uninstall through a named registry
//! - **Object Store**: Kubernetes-backed and in-memory access to ConfigMaps and Secrets

pub mod builder;
pub mod cache;
pub mod chain;
pub mod env;
pub mod error;
pub mod installer;
pub mod resolvers;
pub mod settings;
pub mod source;
pub mod store;

pub use builder::{
    BuilderBase, ControllerValuesBuilder, OperatorValuesBuilder, ValuesBuilder,
    build_with_override,
};
pub use cache::Cache;
pub use chain::{Chain, Resolver};
pub use env::{Environment, MapEnv, ProcessEnv};
pub use error::{ErrorKind, ResolveError, Result, StoreError};
pub use installer::{
    ChartInstaller, ChartSpec, HelmInstaller, InstallLog, InstallerCall, InstallerConfig,
    InstallerFactory, InstallerRegistry, RecordingInstaller, TracingLog, VerboseLog,
};
pub use resolvers::{ConfigCache, CredentialsCache, Resolvers};
pub use settings::{ChartSettings, ObjectRef, ResolverSettings, Settings};
pub use source::{
    ConfigMapSource, EnvConfigSource, EnvCredentialsSource, Retrieval, SecretSource, Source,
};
pub use store::{
    KubeObjectStore, MockObjectStore, ObjectKey, ObjectStore, StoreCounts, StoredObject,
};
