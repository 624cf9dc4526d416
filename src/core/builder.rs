//! Build and install logic
//!
//! Configures a dependency with the generator in a fresh build directory,
//! builds and installs it with the executor, and records which paths the
//! install wrote into the shared prefix.

use std::path::PathBuf;

use crate::config::defaults::GENERATOR_INSTALL_MANIFEST;
use crate::core::context::Context;
use crate::core::dependency::Dependency;
use crate::core::manifest::{InstallManifest, PrefixSnapshot};
use crate::error::DepbuildError;
use crate::infra::filesystem;
use crate::infra::process::{find_tool, LogFile};

/// Result of installing one dependency
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// Build tree used
    pub build_dir: PathBuf,
    /// Number of paths recorded in the install manifest
    pub recorded: usize,
}

/// Check that generator and executor can be found on the build `PATH`
///
/// A missing compiler only produces a warning; the generator reports it
/// with more detail.
pub fn check_tools(ctx: &Context) -> Result<(), DepbuildError> {
    let cwd = ctx.layout.root();
    find_tool(ctx.settings.generator(), Some(&ctx.env), cwd)?;
    find_tool(ctx.settings.executor(), Some(&ctx.env), cwd)?;
    for var in ["CC", "CXX"] {
        if let Some(compiler) = ctx.env.get(var) {
            if find_tool(compiler, Some(&ctx.env), cwd).is_err() {
                tracing::warn!("{var}={compiler} not found on PATH");
            }
        }
    }
    Ok(())
}

/// Configure, build and install `dep` into the shared prefix
///
/// A failing generator never runs the executor. A failing executor still
/// records what it managed to install, marked incomplete, before the error is
/// returned. Nothing is rolled back.
pub async fn install(ctx: &Context, dep: &Dependency) -> Result<InstallResult, DepbuildError> {
    let layout = &ctx.layout;
    let source_dir = layout.source_dir(&dep.name);
    if !source_dir.is_dir() {
        return Err(DepbuildError::NotDownloaded {
            name: dep.name.clone(),
            path: source_dir,
        });
    }

    let build_dir = layout.build_dir(&dep.name);
    if filesystem::remove_dir_all(&build_dir)? {
        tracing::info!("Removed old {}", build_dir.display());
    }
    filesystem::create_dir_all(&build_dir)?;
    tracing::info!("Created {}", build_dir.display());

    let log = LogFile::create(&layout.log_file(&dep.name))?;
    let prefix = layout.install_prefix();
    let tools = ctx.tools();

    tracing::info!("Building {}", dep.name);
    tools
        .generate(&source_dir, &build_dir, &prefix, &dep.build_args, &ctx.env, &log)
        .await?;

    let before = PrefixSnapshot::capture(&prefix)?;
    tracing::info!("Installing {}", dep.name);
    let outcome = tools.install(&build_dir, ctx.jobs, &ctx.env, &log).await;
    let after = PrefixSnapshot::capture(&prefix)?;

    let manifest_path = layout.manifest_file(&dep.name);
    let mut manifest = InstallManifest::record(
        &dep.name,
        layout.variant(),
        &prefix,
        &before,
        &after,
        Some(&build_dir.join(GENERATOR_INSTALL_MANIFEST)),
        outcome.is_ok(),
    )?;
    if let Some(previous) = InstallManifest::load(&manifest_path)? {
        manifest.absorb(&previous, &prefix);
    }
    manifest.save(&manifest_path)?;
    tracing::debug!(
        "Recorded {} installed paths for {} in {}",
        manifest.entries.len(),
        dep.name,
        manifest_path.display()
    );

    outcome?;
    tracing::info!("Finished installation of {}", dep.name);
    Ok(InstallResult {
        build_dir,
        recorded: manifest.entries.len(),
    })
}
