//! Clean logic
//!
//! Removes everything one dependency left behind: its build tree, residue in
//! the shared-memory directory, the files its install manifest records, its
//! source tree and its log. All paths are collected into a [`RemovalPlan`]
//! that is validated before anything is deleted.

use std::path::{Path, PathBuf};

use crate::core::context::Context;
use crate::core::dependency::Dependency;
use crate::core::manifest::InstallManifest;
use crate::core::removal::{PlannedRemoval, RemovalKind, RemovalPlan, RemovalReport};
use crate::error::DepbuildError;

/// Options for clean
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Only compute the plan
    pub dry_run: bool,
}

/// Result of a clean
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Planned removals in execution order
    pub planned: Vec<PlannedRemoval>,
    /// What actually happened; `None` on a dry run
    pub report: Option<RemovalReport>,
    /// Installed paths kept because another manifest records them too
    pub shared: usize,
    /// Whether no install manifest was found
    pub missing_manifest: bool,
}

impl CleanResult {
    /// Number of deleted paths
    pub fn removed(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.removed.len())
    }
}

/// Build the removal plan for `dep` without deleting anything
pub fn plan_clean(ctx: &Context, dep: &Dependency) -> Result<CleanResult, DepbuildError> {
    let (plan, result) = build_plan(ctx, dep)?;
    plan.validate()?;
    Ok(CleanResult {
        planned: plan.entries().to_vec(),
        ..result
    })
}

/// Remove everything `dep` left behind
pub fn clean_dependency(
    ctx: &Context,
    dep: &Dependency,
    options: CleanOptions,
) -> Result<CleanResult, DepbuildError> {
    if options.dry_run {
        return plan_clean(ctx, dep);
    }

    tracing::info!("Cleaning {}", dep.name);
    let (plan, result) = build_plan(ctx, dep)?;
    let planned = plan.entries().to_vec();
    let report = plan.commit()?;
    tracing::info!(
        "Finished cleaning {}: {} removed, {} kept",
        dep.name,
        report.removed.len(),
        report.kept.len() + result.shared
    );
    Ok(CleanResult {
        planned,
        report: Some(report),
        ..result
    })
}

/// Wipe the variant's install prefix and manifests, then recreate them
///
/// Only used after cleaning every entry of the dependency file, to drop
/// anything no manifest accounted for.
pub fn reset_install_prefix(
    ctx: &Context,
    options: CleanOptions,
) -> Result<CleanResult, DepbuildError> {
    let layout = &ctx.layout;
    let mut plan = RemovalPlan::new(layout.removal_roots());
    plan.remove_tree(layout.install_prefix(), "install prefix");
    plan.remove_tree(layout.manifests_dir(), "install manifests");
    let planned = plan.entries().to_vec();

    if options.dry_run {
        plan.validate()?;
        return Ok(CleanResult {
            planned,
            ..CleanResult::default()
        });
    }

    let report = plan.commit()?;
    layout.ensure()?;
    tracing::info!("Reset install prefix {}", layout.install_prefix().display());
    Ok(CleanResult {
        planned,
        report: Some(report),
        ..CleanResult::default()
    })
}

fn build_plan(
    ctx: &Context,
    dep: &Dependency,
) -> Result<(RemovalPlan, CleanResult), DepbuildError> {
    let layout = &ctx.layout;
    let mut plan = RemovalPlan::new(layout.removal_roots());
    let mut result = CleanResult::default();

    plan.remove_tree(layout.build_dir(&dep.name), "build directory");

    if dep.shared_memory {
        for path in shared_memory_residue(layout.shared_memory_dir(), &dep.name) {
            plan.remove_tree(path, "shared memory");
        }
    }

    let manifest_path = layout.manifest_file(&dep.name);
    match InstallManifest::load(&manifest_path)? {
        Some(manifest) => {
            let prefix = layout.install_prefix();
            for path in manifest.modified_files(&prefix) {
                tracing::warn!("{} was modified after {} installed it", path.display(), dep.name);
            }
            let others = InstallManifest::load_all(&layout.manifests_dir())?;
            result.shared = manifest.plan_removal(&prefix, &others, &mut plan);
            plan.push(manifest_path, RemovalKind::File, "install manifest");
        }
        None => {
            tracing::warn!(
                "No install manifest for {} at {}; installed files are left in place",
                dep.name,
                manifest_path.display()
            );
            result.missing_manifest = true;
        }
    }

    if dep.keep_source {
        tracing::debug!("Keeping source of {}", dep.name);
    } else {
        plan.remove_tree(layout.source_dir(&dep.name), "source directory");
    }

    plan.push(layout.log_file(&dep.name), RemovalKind::File, "log file");
    Ok((plan, result))
}

/// Top-most entries under `dir` whose file name contains `name`
fn shared_memory_residue(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable shared memory entry: {e}");
                continue;
            }
        };
        if !entry.file_name().to_string_lossy().contains(name) {
            continue;
        }
        if entry.file_type().is_dir() {
            walker.skip_current_dir();
        }
        found.push(entry.into_path());
    }
    found
}
