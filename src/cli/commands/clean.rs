//! Clean command implementation

use anyhow::{Context as _, Result};

use crate::cli::output::OutputConfig;
use crate::core::clean::{clean_dependency, reset_install_prefix, CleanOptions, CleanResult};
use crate::core::context::Context;
use crate::core::dependency::Dependency;
use crate::core::target::Target;

/// Clean every selected dependency
///
/// Target `all` additionally wipes and recreates the variant's install prefix
/// once every entry is cleaned.
pub fn execute(
    ctx: &Context,
    selected: &[&Dependency],
    target: &Target,
    dry_run: bool,
    output: OutputConfig,
) -> Result<()> {
    let options = CleanOptions { dry_run };

    for dep in selected {
        let result = clean_dependency(ctx, dep, options)
            .with_context(|| format!("Failed to clean {}", dep.name))?;
        report(&dep.name, &result, dry_run, output);
    }

    if target.is_all() {
        let result = reset_install_prefix(ctx, options).context("Failed to reset install prefix")?;
        report(ctx.layout.variant(), &result, dry_run, output);
    }
    Ok(())
}

fn report(name: &str, result: &CleanResult, dry_run: bool, output: OutputConfig) {
    if dry_run {
        println!("Would clean {name}:");
        for planned in &result.planned {
            println!("  remove {planned}");
        }
        return;
    }

    if result.missing_manifest {
        output.warning(&format!(
            "No install manifest for {name}; installed files were left in place"
        ));
    }
    if result.shared > 0 {
        output.success(&format!(
            "Cleaned {name} ({} paths removed, {} shared paths kept)",
            result.removed(),
            result.shared
        ));
    } else {
        output.success(&format!("Cleaned {name} ({} paths removed)", result.removed()));
    }
}
