//! Install and upgrade commands - deploy a chart through the configured installer

use console::style;
use ocean_kube::{InstallerConfig, TracingLog};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{Component, Context, load_overrides};
use crate::error::Result;

/// Options shared by install and upgrade
pub struct DeployOptions<'a> {
    pub component: Component,
    pub release: Option<&'a str>,
    pub namespace: &'a str,
    pub values_files: &'a [PathBuf],
    pub set_values: &'a [String],
    pub bootstrap: &'a [String],
    pub timeout: Option<u64>,
    pub dry_run: bool,
    pub installer: Option<&'a str>,
}

/// Run the install command (or upgrade when `upgrade` is set)
pub async fn run(ctx: &Context, opts: DeployOptions<'_>, upgrade: bool) -> Result<()> {
    let chart = opts.component.chart(&ctx.settings).clone();
    let release = opts.release.unwrap_or(&chart.name).to_string();
    let installer_name = opts.installer.unwrap_or(&ctx.settings.installer);

    let config = InstallerConfig::new(
        &release,
        opts.namespace,
        chart.clone(),
        opts.timeout.map(Duration::from_secs),
        opts.dry_run,
    )?;
    let installer = ctx.registry.create(
        installer_name,
        config,
        Arc::new(TracingLog::new(ctx.verbosity)),
    )?;

    let overrides = load_overrides(opts.values_files, opts.set_values)?;
    let document = ctx
        .render(opts.component, overrides.as_deref(), opts.bootstrap)
        .await?;

    let verb = if upgrade { "Upgrading" } else { "Installing" };
    println!(
        "{} {} chart {} as {} in namespace {}",
        style("→").blue().bold(),
        verb,
        style(&chart.name).cyan(),
        style(&release).cyan(),
        style(opts.namespace).yellow()
    );

    if upgrade {
        installer.upgrade(&document).await?;
    } else {
        installer.install(&document).await?;
    }

    if opts.dry_run {
        println!(
            "{} Dry run - {} would be {}",
            style("✓").green().bold(),
            style(&release).cyan(),
            if upgrade { "upgraded" } else { "installed" }
        );
    } else {
        println!(
            "{} Successfully {} {}",
            style("✓").green().bold(),
            if upgrade { "upgraded" } else { "installed" },
            style(&release).cyan()
        );
    }

    Ok(())
}
