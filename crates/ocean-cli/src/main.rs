//! Ocean CLI - resolve Spot Ocean cluster settings and manage its charts

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod error;
mod exit_codes;

use commands::{Component, Context};
use commands::install::DeployOptions;
use ocean_kube::settings::DEFAULT_NAMESPACE;

#[derive(Parser)]
#[command(name = "ocean")]
#[command(author = "Ocean Contributors")]
#[command(version)]
#[command(about = "Resolve Spot Ocean cluster settings and manage its charts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: ~/.config/ocean/config.yaml)
    #[arg(long, global = true, env = "OCEAN_CONFIG")]
    config: Option<PathBuf>,

    /// Resolve from the environment only, never contact the cluster
    #[arg(long, global = true)]
    no_cluster: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved cluster config and credentials
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the computed values document for a chart
    Values {
        /// Chart family
        #[arg(value_enum)]
        component: Component,

        /// Values file(s) to layer over the computed values
        #[arg(short = 'f', long = "values")]
        values: Vec<PathBuf>,

        /// Set values on command line (key=value)
        #[arg(long = "set")]
        set: Vec<String>,

        /// Operator bootstrap components (default: ocean-controller)
        #[arg(long = "bootstrap", value_delimiter = ',')]
        bootstrap: Vec<String>,
    },

    /// Install a chart, or upgrade it if the release exists
    Install {
        #[command(flatten)]
        deploy: DeployArgs,
    },

    /// Upgrade an existing release
    Upgrade {
        #[command(flatten)]
        deploy: DeployArgs,
    },

    /// Remove a release
    Uninstall {
        /// Chart family
        #[arg(value_enum)]
        component: Component,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(clap::Args)]
struct TargetArgs {
    /// Release name (default: chart name)
    #[arg(long)]
    release: Option<String>,

    /// Target namespace
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Timeout in seconds; also waits for resources to become ready
    #[arg(long)]
    timeout: Option<u64>,

    /// Simulate the operation
    #[arg(long)]
    dry_run: bool,

    /// Installer to use (default from settings)
    #[arg(long)]
    installer: Option<String>,
}

#[derive(clap::Args)]
struct DeployArgs {
    /// Chart family
    #[arg(value_enum)]
    component: Component,

    #[command(flatten)]
    target: TargetArgs,

    /// Values file(s) to layer over the computed values
    #[arg(short = 'f', long = "values")]
    values: Vec<PathBuf>,

    /// Set values on command line (key=value)
    #[arg(long = "set")]
    set: Vec<String>,

    /// Operator bootstrap components (default: ocean-controller)
    #[arg(long = "bootstrap", value_delimiter = ',')]
    bootstrap: Vec<String>,
}

impl DeployArgs {
    fn options(&self) -> DeployOptions<'_> {
        DeployOptions {
            component: self.component,
            release: self.target.release.as_deref(),
            namespace: &self.target.namespace,
            values_files: &self.values,
            set_values: &self.set,
            bootstrap: &self.bootstrap,
            timeout: self.target.timeout,
            dry_run: self.target.dry_run,
            installer: self.target.installer.as_deref(),
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so stdout stays clean for generated documents
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> error::Result<()> {
    let ctx = Context::load(cli.config.as_deref(), cli.no_cluster, cli.debug).await?;

    match cli.command {
        Commands::Resolve { json } => commands::resolve::run(&ctx, json).await,

        Commands::Values {
            component,
            values,
            set,
            bootstrap,
        } => commands::values::run(&ctx, component, &values, &set, &bootstrap).await,

        Commands::Install { deploy } => {
            commands::install::run(&ctx, deploy.options(), false).await
        }

        Commands::Upgrade { deploy } => commands::install::run(&ctx, deploy.options(), true).await,

        Commands::Uninstall { component, target } => {
            commands::uninstall::run(
                &ctx,
                component,
                target.release.as_deref(),
                &target.namespace,
                target.timeout,
                target.dry_run,
                target.installer.as_deref(),
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
