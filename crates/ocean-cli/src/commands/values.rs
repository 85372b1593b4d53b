//! Values command - print the computed values document for a chart

use std::path::PathBuf;

use super::{Component, Context, load_overrides};
use crate::error::Result;

/// Run the values command
pub async fn run(
    ctx: &Context,
    component: Component,
    values_files: &[PathBuf],
    set_values: &[String],
    bootstrap: &[String],
) -> Result<()> {
    let overrides = load_overrides(values_files, set_values)?;
    let document = ctx.render(component, overrides.as_deref(), bootstrap).await?;

    print!("{}", document);
    if !document.ends_with('\n') {
        println!();
    }
    Ok(())
}
