//! Download command implementation

use anyhow::{Context as _, Result};

use crate::cli::output::OutputConfig;
use crate::core::context::Context;
use crate::core::dependency::Dependency;
use crate::core::fetch;

/// Download every selected dependency
pub async fn execute(ctx: &Context, selected: &[&Dependency], output: OutputConfig) -> Result<()> {
    fetch::check_tools(ctx)?;

    for dep in selected {
        let spinner = output.spinner(&format!("Downloading {}...", dep.name));
        let result = fetch::download(ctx, dep).await;
        spinner.finish_and_clear();

        let result = result.with_context(|| format!("Failed to download {}", dep.name))?;
        output.success(&format!(
            "Downloaded {} ({}) into {}",
            dep.name,
            result
                .checked_out
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            result.source_dir.display()
        ));
    }
    Ok(())
}
