//! CLI commands

pub mod install;
pub mod resolve;
pub mod uninstall;
pub mod values;

use clap::ValueEnum;
use ocean_core::{Values, parse_set_values};
use ocean_kube::{
    BuilderBase, ChartSpec, ControllerValuesBuilder, ErrorKind, InstallerRegistry, KubeObjectStore,
    ObjectStore, OperatorValuesBuilder, ProcessEnv, Resolvers, Settings, build_with_override,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{CliError, Result};

/// Chart family a command operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    /// Ocean controller chart
    Controller,
    /// Ocean operator chart
    Operator,
}

impl Component {
    /// Chart coordinates from settings
    pub fn chart<'a>(&self, settings: &'a Settings) -> &'a ChartSpec {
        match self {
            Component::Controller => &settings.charts.controller,
            Component::Operator => &settings.charts.operator,
        }
    }
}

/// Everything a command needs, built once per invocation
pub struct Context {
    pub settings: Settings,
    pub resolvers: Arc<Resolvers>,
    pub registry: InstallerRegistry,
    pub verbosity: u8,
}

impl Context {
    /// Load settings and wire the resolvers
    ///
    /// Without `no_cluster` the cluster is consulted after the environment.
    /// An unreachable cluster degrades to environment-only resolution.
    pub async fn load(config: Option<&Path>, no_cluster: bool, debug: bool) -> Result<Self> {
        let settings = match config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        }
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidConfig => CliError::config_with_help(
                e.to_string(),
                "Fix the settings file or pass another one with --config",
            ),
            _ => e.into(),
        })?;

        let store: Option<Arc<dyn ObjectStore>> = if no_cluster {
            None
        } else {
            match KubeObjectStore::try_default().await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!(error = %e, "cluster unavailable, using environment only");
                    None
                }
            }
        };

        let resolvers = Resolvers::new(Arc::new(ProcessEnv), store, &settings.resolver);
        Ok(Self {
            settings,
            resolvers: Arc::new(resolvers),
            registry: InstallerRegistry::with_defaults(),
            verbosity: u8::from(debug),
        })
    }

    /// Build the values document for a component
    pub async fn render(
        &self,
        component: Component,
        overrides: Option<&str>,
        bootstrap: &[String],
    ) -> Result<String> {
        let base = BuilderBase::new(self.resolvers.clone());
        let document = match component {
            Component::Controller => {
                build_with_override(&ControllerValuesBuilder::new(base), overrides).await?
            }
            Component::Operator => {
                let mut builder = OperatorValuesBuilder::new(base);
                if !bootstrap.is_empty() {
                    builder = builder.with_components(bootstrap.to_vec());
                }
                build_with_override(&builder, overrides).await?
            }
        };
        Ok(document)
    }
}

/// Combine `-f` files and `--set` pairs into one override document
///
/// A lone values file is passed through verbatim so a complete file is
/// used exactly as written.
pub fn load_overrides(files: &[PathBuf], set_values: &[String]) -> Result<Option<String>> {
    match (files, set_values.is_empty()) {
        ([], true) => Ok(None),
        ([file], true) => Ok(Some(std::fs::read_to_string(file).map_err(|e| {
            CliError::Io {
                message: format!("{}: {}", file.display(), e),
            }
        })?)),
        _ => {
            let mut values = Values::new();
            for file in files {
                values.merge(&Values::from_file(file)?);
            }
            if !set_values.is_empty() {
                values.merge(&parse_set_values(set_values)?);
            }
            Ok(Some(values.to_yaml()?))
        }
    }
}
