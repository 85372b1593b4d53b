//! Resolve command - show the effective cluster config and credentials

use console::style;
use ocean_core::{ClusterConfig, Credentials};
use serde_json::json;

use super::Context;
use crate::error::{CliError, Result};

/// Run the resolve command
pub async fn run(ctx: &Context, json: bool) -> Result<()> {
    let config = ctx.resolvers.config().await?;
    let credentials = ctx.resolvers.credentials().await?;

    if json {
        let output = serde_json::to_string_pretty(&to_json(&config, &credentials))
            .map_err(|e| CliError::values(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    println!("{}", style("Cluster").bold());
    println!("  {:<20} {}", "clusterIdentifier:", style(&config.cluster_identifier).cyan());
    if !config.acd_identifier.is_empty() {
        println!("  {:<20} {}", "acdIdentifier:", style(&config.acd_identifier).cyan());
    }

    println!("{}", style("Credentials").bold());
    println!("  {:<20} {}", "account:", style(&credentials.account).cyan());
    println!("  {:<20} {}", "token:", style(mask(&credentials.token)).dim());

    Ok(())
}

fn to_json(config: &ClusterConfig, credentials: &Credentials) -> serde_json::Value {
    json!({
        "clusterIdentifier": config.cluster_identifier,
        "acdIdentifier": config.acd_identifier,
        "account": credentials.account,
        "token": mask(&credentials.token),
    })
}

/// Keep the last four characters of a token
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
