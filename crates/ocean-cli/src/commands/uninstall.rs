//! Uninstall command - remove a chart release

use console::style;
use ocean_kube::{InstallerConfig, TracingLog};
use std::sync::Arc;
use std::time::Duration;

use super::{Component, Context};
use crate::error::Result;

/// Run the uninstall command
pub async fn run(
    ctx: &Context,
    component: Component,
    release: Option<&str>,
    namespace: &str,
    timeout: Option<u64>,
    dry_run: bool,
    installer: Option<&str>,
) -> Result<()> {
    let chart = component.chart(&ctx.settings).clone();
    let release = release.unwrap_or(&chart.name).to_string();
    let installer_name = installer.unwrap_or(&ctx.settings.installer);

    let config = InstallerConfig::new(
        &release,
        namespace,
        chart,
        timeout.map(Duration::from_secs),
        dry_run,
    )?;
    let installer = ctx.registry.create(
        installer_name,
        config,
        Arc::new(TracingLog::new(ctx.verbosity)),
    )?;

    println!(
        "{} Uninstalling {} from namespace {}",
        style("→").blue().bold(),
        style(&release).cyan(),
        style(namespace).yellow()
    );

    installer.uninstall().await?;

    println!(
        "{} {} {}",
        style("✓").green().bold(),
        if dry_run { "Dry run - would uninstall" } else { "Uninstalled" },
        style(&release).cyan()
    );

    Ok(())
}
