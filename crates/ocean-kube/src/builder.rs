//! Chart values builders
//!
//! Builders turn resolved cluster config and credentials into a values
//! document for one chart family. `build_with_override` layers a
//! caller-supplied document on top:
//!
//! 1. A complete (valid) override is returned untouched.
//! 2. Otherwise computed defaults are built and the override is deep-merged
//!    over them, so every explicit override leaf wins.
//!
//! The merged document must still carry every required leaf; a partially
//! resolved value (say, an account without a token) is reported as
//! [`ResolveError::Incomplete`] rather than rendered with blanks.

use async_trait::async_trait;
use ocean_core::{
    BootstrapValues, ChartValues, ClusterConfig, ControllerValues, Credentials, OperatorValues,
    SpotinstValues, Values,
};
use std::sync::Arc;

use crate::env::ProcessEnv;
use crate::error::{ResolveError, Result};
use crate::resolvers::Resolvers;

/// Produces the computed values document for one chart family
#[async_trait]
pub trait ValuesBuilder: Send + Sync {
    type Schema: ChartValues;

    /// Compute a fully populated values document
    async fn build(&self) -> Result<Values>;
}

/// State shared by all builders
///
/// Values set explicitly are used as-is; anything else is pulled through
/// the shared resolver caches.
#[derive(Clone)]
pub struct BuilderBase {
    config: Option<ClusterConfig>,
    credentials: Option<Credentials>,
    resolvers: Arc<Resolvers>,
}

impl Default for BuilderBase {
    fn default() -> Self {
        Self::new(Arc::new(Resolvers::from_env(Arc::new(ProcessEnv))))
    }
}

impl BuilderBase {
    pub fn new(resolvers: Arc<Resolvers>) -> Self {
        Self {
            config: None,
            credentials: None,
            resolvers,
        }
    }

    /// Use this cluster config instead of resolving it
    pub fn with_config(mut self, config: ClusterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use these credentials instead of resolving them
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Resolve through these caches
    pub fn with_resolvers(mut self, resolvers: Arc<Resolvers>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub async fn config(&self) -> Result<ClusterConfig> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => self.resolvers.config().await,
        }
    }

    pub async fn credentials(&self) -> Result<Credentials> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => self.resolvers.credentials().await,
        }
    }

    async fn spotinst(&self) -> Result<SpotinstValues> {
        let config = self.config().await?;
        let credentials = self.credentials().await?;
        Ok(SpotinstValues::from_resolved(&config, &credentials))
    }
}

fn to_values<T: serde::Serialize>(schema: &T) -> Result<Values> {
    Values::from_serializable(schema).map_err(|e| ResolveError::Serialize(e.to_string()))
}

/// Builds values for the ocean-controller chart
#[derive(Clone, Default)]
pub struct ControllerValuesBuilder {
    base: BuilderBase,
}

impl ControllerValuesBuilder {
    pub fn new(base: BuilderBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl ValuesBuilder for ControllerValuesBuilder {
    type Schema = ControllerValues;

    async fn build(&self) -> Result<Values> {
        let values = ControllerValues {
            spotinst: self.base.spotinst().await?,
        };
        to_values(&values)
    }
}

/// Builds values for the ocean-operator chart
#[derive(Clone, Default)]
pub struct OperatorValuesBuilder {
    base: BuilderBase,
    components: Option<Vec<String>>,
}

impl OperatorValuesBuilder {
    pub fn new(base: BuilderBase) -> Self {
        Self {
            base,
            components: None,
        }
    }

    /// Bootstrap these components instead of the defaults
    pub fn with_components(mut self, components: Vec<String>) -> Self {
        self.components = Some(components);
        self
    }
}

#[async_trait]
impl ValuesBuilder for OperatorValuesBuilder {
    type Schema = OperatorValues;

    async fn build(&self) -> Result<Values> {
        let bootstrap = match &self.components {
            Some(components) => BootstrapValues {
                components: components.clone(),
            },
            None => BootstrapValues::with_defaults(),
        };
        let values = OperatorValues {
            spotinst: self.base.spotinst().await?,
            bootstrap,
        };
        to_values(&values)
    }
}

/// Build a values document, honoring a caller-supplied override
///
/// `overrides` is YAML (JSON is accepted too). A missing, blank or null
/// override counts as empty.
pub async fn build_with_override<B>(builder: &B, overrides: Option<&str>) -> Result<String>
where
    B: ValuesBuilder + ?Sized,
{
    let text = overrides.unwrap_or_default();
    let overlay = Values::from_yaml(text).map_err(|e| ResolveError::Decode(e.to_string()))?;
    let schema: B::Schema = overlay
        .decode()
        .map_err(|e| ResolveError::Decode(e.to_string()))?;

    if schema.is_valid() {
        tracing::debug!(chart = <B::Schema as ChartValues>::CHART, "override is complete, skipping defaults");
        return Ok(text.to_string());
    }

    let mut values = builder.build().await?;
    values.merge(&overlay);

    let merged: B::Schema = values
        .decode()
        .map_err(|e| ResolveError::Decode(e.to_string()))?;
    let missing = merged.missing_fields();
    if !missing.is_empty() {
        return Err(ResolveError::Incomplete {
            chart: <B::Schema as ChartValues>::CHART,
            missing,
        });
    }

    values
        .to_yaml()
        .map_err(|e| ResolveError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::chain::tests::{FakeSource, chain_of};
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn preset() -> BuilderBase {
        BuilderBase::default()
            .with_config(ClusterConfig::new("c1", ""))
            .with_credentials(Credentials::new("t1", "a1"))
    }

    /// Builder that counts how often defaults are computed
    #[derive(Default)]
    struct CountingBuilder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ValuesBuilder for CountingBuilder {
        type Schema = ControllerValues;

        async fn build(&self) -> Result<Values> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Values(json!({
                "spotinst": {"token": "computed", "account": "computed", "clusterIdentifier": "computed"}
            })))
        }
    }

    #[tokio::test]
    async fn test_valid_override_is_returned_unchanged() {
        let builder = CountingBuilder::default();
        let overrides = "spotinst: {token: \"t\", account: \"a\", clusterIdentifier: \"c\"}\n";

        let document = build_with_override(&builder, Some(overrides)).await.unwrap();

        assert_eq!(document, overrides);
        assert_eq!(builder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_override_consults_defaults() {
        let builder = CountingBuilder::default();

        build_with_override(&builder, Some("spotinst:\n  account: a\n"))
            .await
            .unwrap();

        assert_eq!(builder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_override_yields_resolved_values_only() {
        let builder = ControllerValuesBuilder::new(preset());

        let document = build_with_override(&builder, None).await.unwrap();
        let values = Values::from_yaml(&document).unwrap();

        assert_eq!(
            values,
            Values(json!({
                "spotinst": {"token": "t1", "account": "a1", "clusterIdentifier": "c1"}
            }))
        );
    }

    #[tokio::test]
    async fn test_blank_and_null_overrides_are_empty() {
        let builder = ControllerValuesBuilder::new(preset());
        let expected = build_with_override(&builder, None).await.unwrap();

        for overrides in ["", "  \n", "~", "null"] {
            let document = build_with_override(&builder, Some(overrides)).await.unwrap();
            assert_eq!(document, expected, "override {:?}", overrides);
        }
    }

    #[tokio::test]
    async fn test_override_leaves_win() {
        let builder = ControllerValuesBuilder::new(preset());
        let overrides = "spotinst:\n  token: override-token\nextra:\n  enabled: \"true\"\n";

        let document = build_with_override(&builder, Some(overrides)).await.unwrap();
        let values = Values::from_yaml(&document).unwrap();

        assert_eq!(values.get("spotinst.token").unwrap(), "override-token");
        assert_eq!(values.get("spotinst.account").unwrap(), "a1");
        assert_eq!(values.get("spotinst.clusterIdentifier").unwrap(), "c1");
        assert_eq!(values.get("extra.enabled").unwrap(), "true");
    }

    #[tokio::test]
    async fn test_operator_defaults_and_component_override() {
        let builder = OperatorValuesBuilder::new(preset());
        let document = build_with_override(&builder, None).await.unwrap();
        let values = Values::from_yaml(&document).unwrap();
        assert_eq!(
            values.get("bootstrap.components").unwrap(),
            &json!(["ocean-controller"])
        );

        let overrides = "bootstrap:\n  components: [ocean-controller, metrics-server]\n";
        let document = build_with_override(&builder, Some(overrides)).await.unwrap();
        let values = Values::from_yaml(&document).unwrap();
        assert_eq!(
            values.get("bootstrap.components").unwrap(),
            &json!(["ocean-controller", "metrics-server"])
        );
        assert_eq!(values.get("spotinst.token").unwrap(), "t1");
    }

    #[tokio::test]
    async fn test_partially_resolved_credentials_are_incomplete() {
        let base = BuilderBase::default()
            .with_config(ClusterConfig::new("c1", ""))
            .with_credentials(Credentials::new("", "a1"));
        let builder = ControllerValuesBuilder::new(base);

        let err = build_with_override(&builder, None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Incomplete);
        assert_eq!(
            err.to_string(),
            "incomplete ocean-controller values: missing spotinst.token"
        );
    }

    #[tokio::test]
    async fn test_override_can_complete_partial_resolution() {
        let base = BuilderBase::default()
            .with_config(ClusterConfig::new("c1", ""))
            .with_credentials(Credentials::new("", "a1"));
        let builder = ControllerValuesBuilder::new(base);

        let document = build_with_override(&builder, Some("spotinst:\n  token: t9\n"))
            .await
            .unwrap();
        let values = Values::from_yaml(&document).unwrap();

        assert_eq!(values.get("spotinst.token").unwrap(), "t9");
        assert_eq!(values.get("spotinst.account").unwrap(), "a1");
    }

    #[tokio::test]
    async fn test_blanked_components_are_incomplete() {
        let builder = OperatorValuesBuilder::new(preset());

        let err = build_with_override(&builder, Some("bootstrap:\n  components: []\n"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Incomplete);
        assert!(err.to_string().contains("bootstrap.components"));
    }

    #[tokio::test]
    async fn test_operator_custom_components() {
        let builder = OperatorValuesBuilder::new(preset()).with_components(vec!["custom".into()]);
        let values = builder.build().await.unwrap();

        assert_eq!(values.get("bootstrap.components").unwrap(), &json!(["custom"]));
    }

    #[tokio::test]
    async fn test_malformed_override_is_decode_error() {
        let builder = CountingBuilder::default();

        let err = build_with_override(&builder, Some("spotinst: [unclosed"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = build_with_override(&builder, Some("spotinst:\n  token: [a, b]\n"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(builder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolution_failure_is_propagated() {
        let resolvers = Resolvers::from_chains(
            chain_of(&[FakeSource::failing("configmap", ClusterConfig::default(), "forbidden")]),
            Chain::new(Vec::new()),
        );
        let builder = ControllerValuesBuilder::new(BuilderBase::new(Arc::new(resolvers)));

        let err = build_with_override(&builder, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Chain);
        assert_eq!(err.to_string(), "forbidden");
    }

    #[tokio::test]
    async fn test_lazy_resolution_goes_through_cache() {
        let config = FakeSource::ok("env", ClusterConfig::new("c2", "acd-2"));
        let credentials = FakeSource::ok("env", Credentials::new("t2", "a2"));
        let resolvers = Arc::new(Resolvers::from_chains(
            chain_of(&[config.clone()]),
            chain_of(&[credentials.clone()]),
        ));
        let base = BuilderBase::new(resolvers);

        let controller = ControllerValuesBuilder::new(base.clone());
        let operator = OperatorValuesBuilder::new(base);
        let values = controller.build().await.unwrap();
        operator.build().await.unwrap();

        assert_eq!(values.get("spotinst.acdIdentifier").unwrap(), "acd-2");
        assert_eq!(config.calls(), 1);
        assert_eq!(credentials.calls(), 1);
    }
}
