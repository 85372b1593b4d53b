//! Priority-ordered resolution over several sources
//!
//! Sources are consulted strictly in order. Fields set by an earlier source
//! are never overwritten by a later one, and the walk stops as soon as the
//! accumulated value is complete.

use async_trait::async_trait;
use ocean_core::Resolvable;
use std::sync::Arc;

use crate::error::{ResolveError, Result};
use crate::source::Source;

/// Anything that can produce a resolved value
#[async_trait]
pub trait Resolver<V: Resolvable>: Send + Sync {
    async fn resolve(&self) -> Result<V>;
}

#[async_trait]
impl<V: Resolvable, R: Resolver<V> + ?Sized> Resolver<V> for Arc<R> {
    async fn resolve(&self) -> Result<V> {
        (**self).resolve().await
    }
}

/// Ordered list of sources, highest priority first
pub struct Chain<V: Resolvable> {
    sources: Vec<Arc<dyn Source<V>>>,
}

impl<V: Resolvable> Chain<V> {
    pub fn new(sources: Vec<Arc<dyn Source<V>>>) -> Self {
        Self { sources }
    }

    /// Append a lower-priority source
    pub fn with_source(mut self, source: Arc<dyn Source<V>>) -> Self {
        self.sources.push(source);
        self
    }

    /// Names of the sources in priority order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Walk the sources and combine their results
    ///
    /// Errors from individual sources are collected, not returned, unless
    /// nothing usable was found. A non-empty but incomplete result is
    /// returned as-is; callers check `is_complete` themselves.
    pub async fn retrieve(&self) -> Result<V> {
        let mut value = V::default();
        let mut errors = Vec::new();

        for source in &self.sources {
            let retrieval = source.retrieve().await;

            if let Some(err) = retrieval.error {
                tracing::debug!(source = source.name(), kind = V::KIND, error = %err, "source failed");
                errors.push(err);
            }

            value.merge(&retrieval.value);

            if value.is_complete() {
                tracing::debug!(source = source.name(), kind = V::KIND, "resolution complete");
                break;
            }
        }

        if value.is_empty() {
            if errors.is_empty() {
                return Err(ResolveError::NoValidSource { what: V::KIND });
            }
            return Err(ResolveError::Chain {
                what: V::KIND,
                errors,
            });
        }

        Ok(value)
    }
}

#[async_trait]
impl<V: Resolvable> Resolver<V> for Chain<V> {
    async fn resolve(&self) -> Result<V> {
        self.retrieve().await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::Retrieval;
    use ocean_core::{ClusterConfig, Credentials};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source returning a fixed outcome and counting its calls
    pub(crate) struct FakeSource<V> {
        name: String,
        value: V,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl<V: Resolvable> FakeSource<V> {
        pub(crate) fn ok(name: &str, value: V) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                value,
                error: None,
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn failing(name: &str, value: V, error: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                value,
                error: Some(error.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<V: Resolvable> Source<V> for FakeSource<V> {
        fn name(&self) -> &str {
            &self.name
        }

        async fn retrieve(&self) -> Retrieval<V> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Retrieval {
                value: self.value.clone(),
                error: self.error.clone().map(ResolveError::Source),
            }
        }
    }

    pub(crate) fn chain_of<V: Resolvable>(sources: &[Arc<FakeSource<V>>]) -> Chain<V> {
        Chain::new(
            sources
                .iter()
                .map(|s| s.clone() as Arc<dyn Source<V>>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_combines_partial_sources() {
        let first = FakeSource::ok("first", ClusterConfig::new("x", ""));
        let second = FakeSource::ok("second", ClusterConfig::new("", "y"));
        let chain = chain_of(&[first.clone(), second.clone()]);

        let value = chain.retrieve().await.unwrap();

        assert_eq!(value, ClusterConfig::new("x", "y"));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_stops_once_complete() {
        let first = FakeSource::ok("first", Credentials::new("t", "a"));
        let second = FakeSource::ok("second", Credentials::new("t2", "a2"));
        let chain = chain_of(&[first.clone(), second.clone()]);

        let value = chain.retrieve().await.unwrap();

        assert_eq!(value, Credentials::new("t", "a"));
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_earlier_source_wins() {
        let chain = chain_of(&[
            FakeSource::ok("env", Credentials::new("env-token", "")),
            FakeSource::ok("secret", Credentials::new("secret-token", "act-1")),
        ]);

        let value = chain.retrieve().await.unwrap();
        assert_eq!(value, Credentials::new("env-token", "act-1"));
    }

    #[tokio::test]
    async fn test_aggregates_errors_in_order() {
        let chain = chain_of(&[
            FakeSource::failing("first", Credentials::default(), "e1"),
            FakeSource::failing("second", Credentials::default(), "e2"),
        ]);

        let err = chain.retrieve().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Chain);
        assert_eq!(err.to_string(), "e1\ne2");
        assert_eq!(err.domain(), Some(Credentials::KIND));
    }

    #[tokio::test]
    async fn test_empty_without_errors_is_no_valid_source() {
        let chain = chain_of(&[FakeSource::ok("empty", ClusterConfig::default())]);

        let err = chain.retrieve().await.unwrap_err();

        assert!(err.is_no_valid_source());
        assert_eq!(err.domain(), Some(ClusterConfig::KIND));
    }

    #[tokio::test]
    async fn test_no_sources_is_no_valid_source() {
        let chain: Chain<Credentials> = Chain::new(Vec::new());
        assert!(chain.retrieve().await.unwrap_err().is_no_valid_source());
    }

    #[tokio::test]
    async fn test_errors_do_not_abort_chain() {
        let chain = chain_of(&[
            FakeSource::failing("broken", Credentials::default(), "unreachable"),
            FakeSource::ok("secret", Credentials::new("t", "a")),
        ]);

        assert_eq!(chain.retrieve().await.unwrap(), Credentials::new("t", "a"));
    }

    #[tokio::test]
    async fn test_partial_success_value_is_kept() {
        let chain = chain_of(&[
            FakeSource::failing("flaky", Credentials::new("t", ""), "account lookup failed"),
            FakeSource::ok("secret", Credentials::new("", "a")),
        ]);

        assert_eq!(chain.retrieve().await.unwrap(), Credentials::new("t", "a"));
    }

    #[tokio::test]
    async fn test_incomplete_result_is_not_an_error() {
        let chain = chain_of(&[
            FakeSource::ok("env", ClusterConfig::new("ocn-1", "")),
            FakeSource::failing("configmap", ClusterConfig::default(), "forbidden"),
        ]);

        let value = chain.retrieve().await.unwrap();
        assert!(!value.is_complete());
        assert_eq!(value.cluster_identifier, "ocn-1");
    }

    #[tokio::test]
    async fn test_config_without_primary_field_is_empty() {
        // An ACD identifier alone does not make the config usable
        let chain = chain_of(&[FakeSource::ok("env", ClusterConfig::new("", "acd-1"))]);

        assert!(chain.retrieve().await.unwrap_err().is_no_valid_source());
    }

    #[tokio::test]
    async fn test_source_names_keep_order() {
        let chain = chain_of(&[FakeSource::ok("env", Credentials::default())])
            .with_source(FakeSource::ok("secret", Credentials::default()) as Arc<dyn Source<_>>);

        assert_eq!(chain.source_names(), vec!["env", "secret"]);
    }
}
