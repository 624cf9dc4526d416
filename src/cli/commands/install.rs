//! Install command implementation

use anyhow::{Context as _, Result};

use crate::cli::output::OutputConfig;
use crate::core::builder;
use crate::core::context::Context;
use crate::core::dependency::Dependency;

/// Build and install every selected dependency
pub async fn execute(ctx: &Context, selected: &[&Dependency], output: OutputConfig) -> Result<()> {
    builder::check_tools(ctx)?;

    for dep in selected {
        let spinner = output.spinner(&format!(
            "Building {} ({}, -j{})...",
            dep.name,
            ctx.layout.variant(),
            ctx.jobs
        ));
        let result = builder::install(ctx, dep).await;
        spinner.finish_and_clear();

        let result = result.with_context(|| format!("Failed to install {}", dep.name))?;
        output.success(&format!(
            "Installed {} into {} ({} paths recorded)",
            dep.name,
            ctx.layout.install_prefix().display(),
            result.recorded
        ));
    }
    Ok(())
}
