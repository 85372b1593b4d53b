//! Helm CLI installer

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use super::{ChartInstaller, InstallLog, InstallerConfig};
use crate::error::{ResolveError, Result};

/// Drives the `helm` binary
///
/// Values are streamed on stdin (`--values -`), so nothing is written to
/// disk. Stdout and stderr go to the install log line by line.
pub struct HelmInstaller {
    config: InstallerConfig,
    log: Arc<dyn InstallLog>,
    binary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Install,
    Upgrade,
    Uninstall,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Upgrade => "upgrade",
            Action::Uninstall => "uninstall",
        }
    }
}

impl HelmInstaller {
    pub const NAME: &'static str = "helm";

    pub fn new(config: InstallerConfig, log: Arc<dyn InstallLog>) -> Self {
        Self {
            config,
            log,
            binary: "helm".to_string(),
        }
    }

    /// Use a different helm executable
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn verbose(&self) -> bool {
        self.log.as_verbose().is_some_and(|v| v.verbosity() > 0)
    }

    fn args(&self, action: Action) -> Vec<String> {
        let config = &self.config;
        let mut args: Vec<String> = match action {
            Action::Install => vec!["upgrade".into(), "--install".into()],
            Action::Upgrade => vec!["upgrade".into()],
            Action::Uninstall => vec!["uninstall".into()],
        };
        args.push(config.release().to_string());

        if action != Action::Uninstall {
            let chart = config.chart();
            args.push(chart.name.clone());
            args.extend(["--repo".to_string(), chart.repository.clone()]);
            if !chart.version.is_empty() {
                args.extend(["--version".to_string(), chart.version.clone()]);
            }
            args.extend(["--values".to_string(), "-".to_string()]);
        }
        if action == Action::Install {
            args.push("--create-namespace".into());
        }

        args.extend(["--namespace".to_string(), config.namespace().to_string()]);
        if let Some(timeout) = config.timeout() {
            args.extend(["--timeout".to_string(), format!("{}s", timeout.as_secs())]);
            args.push("--wait".into());
        }
        if config.dry_run() {
            args.push("--dry-run".into());
        }
        if self.verbose() {
            args.push("--debug".into());
        }
        args
    }

    async fn run(&self, action: Action, values: Option<&str>) -> Result<()> {
        let args = self.args(action);
        tracing::debug!(binary = %self.binary, ?args, "running helm");

        let failed = |message: String| ResolveError::Installer {
            installer: Self::NAME.to_string(),
            action: action.as_str(),
            release: self.config.release().to_string(),
            message,
        };

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(if values.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failed(format!("failed to start {}: {}", self.binary, e)))?;

        if let (Some(values), Some(mut stdin)) = (values, child.stdin.take()) {
            stdin
                .write_all(values.as_bytes())
                .await
                .map_err(|e| failed(format!("failed to write values: {}", e)))?;
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let log = self.log.clone();
        let (_, errors, status) = tokio::join!(
            forward(stdout, log.as_ref(), false),
            forward(stderr, log.as_ref(), true),
            child.wait()
        );

        let status = status.map_err(|e| failed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            let message = match errors.last() {
                Some(line) => line.clone(),
                None => format!("helm exited with {}", status),
            };
            Err(failed(message))
        }
    }
}

/// Copy lines to the log; stderr lines are also returned
async fn forward<R>(reader: Option<R>, log: &dyn InstallLog, keep: bool) -> Vec<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    let Some(reader) = reader else {
        return kept;
    };

    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        log.line(&line);
        if keep && !line.trim().is_empty() {
            kept.push(line);
        }
    }
    kept
}

#[async_trait]
impl ChartInstaller for HelmInstaller {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn install(&self, values: &str) -> Result<()> {
        self.run(Action::Install, Some(values)).await
    }

    async fn upgrade(&self, values: &str) -> Result<()> {
        self.run(Action::Upgrade, Some(values)).await
    }

    async fn uninstall(&self) -> Result<()> {
        self.run(Action::Uninstall, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{ChartSpec, TracingLog};
    use std::time::Duration;

    fn installer(version: &str, timeout: Option<Duration>, dry_run: bool) -> HelmInstaller {
        let config = InstallerConfig::new(
            "ocean",
            "spot-system",
            ChartSpec::new("ocean-operator", "https://charts.spot.io", version),
            timeout,
            dry_run,
        )
        .unwrap();
        HelmInstaller::new(config, Arc::new(TracingLog::default()))
    }

    #[test]
    fn test_install_args() {
        let args = installer("", None, false).args(Action::Install);

        assert_eq!(
            args,
            [
                "upgrade",
                "--install",
                "ocean",
                "ocean-operator",
                "--repo",
                "https://charts.spot.io",
                "--values",
                "-",
                "--create-namespace",
                "--namespace",
                "spot-system",
            ]
        );
    }

    #[test]
    fn test_upgrade_args_with_options() {
        let args = installer("0.1.5", Some(Duration::from_secs(90)), true).args(Action::Upgrade);

        assert_eq!(args[0], "upgrade");
        assert!(!args.contains(&"--install".to_string()));
        assert!(args.windows(2).any(|w| w == ["--version", "0.1.5"]));
        assert!(args.windows(2).any(|w| w == ["--timeout", "90s"]));
        assert!(args.contains(&"--wait".to_string()));
        assert!(args.contains(&"--dry-run".to_string()));
        assert!(!args.contains(&"--debug".to_string()));
    }

    #[test]
    fn test_uninstall_args() {
        let args = installer("0.1.5", None, false).args(Action::Uninstall);

        assert_eq!(args, ["uninstall", "ocean", "--namespace", "spot-system"]);
    }

    #[test]
    fn test_verbose_log_adds_debug() {
        let mut helm = installer("", None, false);
        helm.log = Arc::new(TracingLog::new(1));

        assert!(helm.args(Action::Install).contains(&"--debug".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_installer_error() {
        let helm = installer("", None, false).with_binary("ocean-test-no-such-helm");

        let err = helm.uninstall().await.unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Installer);
        assert!(
            err.to_string()
                .starts_with("installer 'helm' failed to uninstall release 'ocean': failed to start")
        );
    }
}
