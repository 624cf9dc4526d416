//! Removal plans
//!
//! Every destructive step of clean goes through a [`RemovalPlan`]: paths are
//! collected first, the whole plan is validated against the managed roots, and
//! only then is anything deleted. A plan that fails validation deletes
//! nothing.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::RemovalError;
use crate::infra::filesystem;

/// How a planned path is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Remove whatever is there; directories recursively
    Tree,
    /// Remove a file or symlink; a directory found there is kept
    File,
    /// Remove a directory only if it is empty
    EmptyDir,
}

/// One planned removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRemoval {
    /// Absolute path to remove
    pub path: PathBuf,
    /// Removal mode
    pub kind: RemovalKind,
    /// Why the path is removed, for logs and dry runs
    pub reason: &'static str,
}

impl fmt::Display for PlannedRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.kind {
            RemovalKind::Tree => "tree",
            RemovalKind::File => "file",
            RemovalKind::EmptyDir => "dir if empty",
        };
        write!(f, "{} ({}, {})", self.path.display(), self.reason, mode)
    }
}

/// Outcome of committing a plan
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Paths that were deleted
    pub removed: Vec<PathBuf>,
    /// Paths that did not exist
    pub missing: Vec<PathBuf>,
    /// Paths left in place (non-empty directories, directories planned as files)
    pub kept: Vec<PathBuf>,
}

/// Ordered list of pending deletions confined to a set of roots
#[derive(Debug, Clone)]
pub struct RemovalPlan {
    roots: Vec<PathBuf>,
    entries: Vec<PlannedRemoval>,
}

impl RemovalPlan {
    /// Create an empty plan allowed to delete strictly inside `roots`
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            entries: Vec::new(),
        }
    }

    /// Queue a path
    pub fn push(&mut self, path: PathBuf, kind: RemovalKind, reason: &'static str) {
        self.entries.push(PlannedRemoval { path, kind, reason });
    }

    /// Queue a path for recursive removal
    pub fn remove_tree(&mut self, path: PathBuf, reason: &'static str) {
        self.push(path, RemovalKind::Tree, reason);
    }

    /// Planned removals in execution order
    pub fn entries(&self) -> &[PlannedRemoval] {
        &self.entries
    }

    /// Check every entry is confined to the roots
    pub fn validate(&self) -> Result<(), RemovalError> {
        for entry in &self.entries {
            self.check(&entry.path)?;
        }
        Ok(())
    }

    fn check(&self, path: &Path) -> Result<(), RemovalError> {
        if normalize(path).as_deref() != Some(path) {
            return Err(RemovalError::NotNormalized {
                path: path.to_path_buf(),
            });
        }
        if self.roots.iter().any(|root| root == path) {
            return Err(RemovalError::IsRoot {
                path: path.to_path_buf(),
            });
        }
        let Some(root) = self.roots.iter().find(|root| path.starts_with(root)) else {
            return Err(RemovalError::OutsideRoots {
                path: path.to_path_buf(),
            });
        };

        // A symlinked ancestor must not lead out of the root.
        if let (Some(parent), Ok(real_root)) = (path.parent(), root.canonicalize()) {
            if let Ok(real_parent) = parent.canonicalize() {
                if !real_parent.starts_with(&real_root) {
                    return Err(RemovalError::OutsideRoots {
                        path: path.to_path_buf(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate the whole plan, then delete its entries in order
    pub fn commit(self) -> Result<RemovalReport, RemovalError> {
        self.validate()?;

        let mut report = RemovalReport::default();
        for entry in self.entries {
            let path = entry.path;
            let outcome = match entry.kind {
                RemovalKind::Tree => filesystem::remove_any(&path)?.then_some(true),
                RemovalKind::File => match path.symlink_metadata() {
                    Err(_) => None,
                    Ok(meta) if meta.is_dir() => Some(false),
                    Ok(_) => filesystem::remove_file(&path)?.then_some(true),
                },
                RemovalKind::EmptyDir => {
                    if path.is_dir() {
                        Some(filesystem::remove_dir_if_empty(&path)?)
                    } else {
                        None
                    }
                }
            };
            match outcome {
                Some(true) => {
                    tracing::info!("Removed {} ({})", path.display(), entry.reason);
                    report.removed.push(path);
                }
                Some(false) => {
                    tracing::debug!("Kept {} ({})", path.display(), entry.reason);
                    report.kept.push(path);
                }
                None => report.missing.push(path),
            }
        }
        Ok(report)
    }
}

/// Lexically normalize an absolute path
///
/// Removes `.` components and resolves `..` against preceding components.
/// Returns `None` for relative paths and for paths climbing above `/`.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    if !path.is_absolute() {
        return None;
    }
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.parent().is_none() {
                    return None;
                }
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Some(out)
}
