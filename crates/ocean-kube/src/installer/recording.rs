//! In-memory installer for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{ChartInstaller, ChartSpec, InstallerConfig};
use crate::error::{ResolveError, Result};

/// One recorded installer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerCall {
    Install { release: String, values: String },
    Upgrade { release: String, values: String },
    Uninstall { release: String },
}

/// Installer that records calls instead of touching a cluster
///
/// Clones share the same call log, so a test can keep one handle and give
/// another to a registry factory.
#[derive(Debug, Clone)]
pub struct RecordingInstaller {
    config: InstallerConfig,
    calls: Arc<RwLock<Vec<InstallerCall>>>,
    fail_with: Option<String>,
}

impl Default for RecordingInstaller {
    fn default() -> Self {
        Self {
            config: InstallerConfig {
                release: "recording".to_string(),
                namespace: "default".to_string(),
                chart: ChartSpec::new("recording", "memory://", ""),
                timeout: None,
                dry_run: false,
            },
            calls: Arc::new(RwLock::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl RecordingInstaller {
    /// Same call log, different release
    pub fn with_config(&self, config: InstallerConfig) -> Self {
        Self {
            config,
            calls: self.calls.clone(),
            fail_with: self.fail_with.clone(),
        }
    }

    /// Fail every call with this message
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<InstallerCall> {
        self.calls.read().unwrap().clone()
    }

    fn record(&self, action: &'static str, call: InstallerCall) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(ResolveError::Installer {
                installer: self.name().to_string(),
                action,
                release: self.config.release().to_string(),
                message: message.clone(),
            });
        }
        self.calls.write().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl ChartInstaller for RecordingInstaller {
    fn name(&self) -> &str {
        "recording"
    }

    async fn install(&self, values: &str) -> Result<()> {
        self.record(
            "install",
            InstallerCall::Install {
                release: self.config.release().to_string(),
                values: values.to_string(),
            },
        )
    }

    async fn upgrade(&self, values: &str) -> Result<()> {
        self.record(
            "upgrade",
            InstallerCall::Upgrade {
                release: self.config.release().to_string(),
                values: values.to_string(),
            },
        )
    }

    async fn uninstall(&self) -> Result<()> {
        self.record(
            "uninstall",
            InstallerCall::Uninstall {
                release: self.config.release().to_string(),
            },
        )
    }
}
