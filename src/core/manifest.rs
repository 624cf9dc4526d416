//! Install manifests
//!
//! An install manifest records exactly which paths under the shared install
//! prefix a dependency's install step created or rewrote. Clean removes that
//! recorded set and nothing else, so dependencies sharing a prefix can be
//! removed independently.
//!
//! Provenance comes from two sources that are merged:
//! - a snapshot of the prefix taken before the executor runs, compared with
//!   one taken afterwards (new paths and files whose size or mtime changed);
//! - the generator's own `install_manifest.txt`, when it writes one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::core::removal::{RemovalKind, RemovalPlan};
use crate::error::{FilesystemError, ManifestError};
use crate::infra::filesystem;

/// Kind of an installed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Symbolic link
    Symlink,
    /// Directory created by the install
    Dir,
}

/// One recorded path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the install prefix
    pub path: PathBuf,
    /// What was installed there
    pub kind: EntryKind,
    /// SHA-256 of regular files at install time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Paths one install wrote into the shared prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Dependency name
    pub name: String,
    /// Build variant
    pub variant: String,
    /// Install prefix at install time
    pub prefix: PathBuf,
    /// False when the executor failed part way through
    pub complete: bool,
    /// Recorded paths, sorted
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    kind: EntryKind,
    len: u64,
    modified: Option<SystemTime>,
}

/// State of a prefix at one point in time
#[derive(Debug, Clone, Default)]
pub struct PrefixSnapshot {
    entries: BTreeMap<PathBuf, Stamp>,
}

impl PrefixSnapshot {
    /// Walk `prefix` without following symlinks
    ///
    /// A missing prefix yields an empty snapshot.
    pub fn capture(prefix: &Path) -> Result<Self, FilesystemError> {
        let mut entries = BTreeMap::new();
        if !prefix.is_dir() {
            return Ok(Self { entries });
        }
        for entry in walkdir::WalkDir::new(prefix).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| FilesystemError::Walk {
                path: prefix.to_path_buf(),
                error: e.to_string(),
            })?;
            let meta = entry.metadata().map_err(|e| FilesystemError::Walk {
                path: entry.path().to_path_buf(),
                error: e.to_string(),
            })?;
            let kind = if meta.file_type().is_symlink() {
                EntryKind::Symlink
            } else if meta.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            let Ok(relative) = entry.path().strip_prefix(prefix) else {
                continue;
            };
            entries.insert(
                relative.to_path_buf(),
                Stamp {
                    kind,
                    len: meta.len(),
                    modified: meta.modified().ok(),
                },
            );
        }
        Ok(Self { entries })
    }

    /// Paths that are new in `self` or, for non-directories, changed since `before`
    pub fn changes_since(&self, before: &PrefixSnapshot) -> BTreeMap<PathBuf, EntryKind> {
        self.entries
            .iter()
            .filter(|(path, stamp)| match before.entries.get(*path) {
                None => true,
                Some(old) => stamp.kind != EntryKind::Dir && *old != **stamp,
            })
            .map(|(path, stamp)| (path.clone(), stamp.kind))
            .collect()
    }
}

impl InstallManifest {
    /// Build a manifest from the prefix state around an install
    ///
    /// `generator_manifest` is the generator's list of installed absolute
    /// paths, one per line; entries outside `prefix` are ignored.
    pub fn record(
        name: &str,
        variant: &str,
        prefix: &Path,
        before: &PrefixSnapshot,
        after: &PrefixSnapshot,
        generator_manifest: Option<&Path>,
        complete: bool,
    ) -> Result<Self, ManifestError> {
        let mut paths = after.changes_since(before);

        if let Some(listing) = generator_manifest.filter(|p| p.is_file()) {
            for line in filesystem::read_file(listing)?.lines() {
                let Ok(relative) = Path::new(line.trim()).strip_prefix(prefix) else {
                    continue;
                };
                if let Some(stamp) = after.entries.get(relative) {
                    paths.entry(relative.to_path_buf()).or_insert(stamp.kind);
                }
            }
        }

        let mut entries = Vec::with_capacity(paths.len());
        for (path, kind) in paths {
            let sha256 = match kind {
                EntryKind::File => Some(file_digest(&prefix.join(&path))?),
                EntryKind::Symlink | EntryKind::Dir => None,
            };
            entries.push(ManifestEntry { path, kind, sha256 });
        }

        Ok(Self {
            name: name.to_string(),
            variant: variant.to_string(),
            prefix: prefix.to_path_buf(),
            complete,
            entries,
        })
    }

    /// Keep entries of an earlier install that still exist under `prefix`
    ///
    /// A reinstall only sees what its executor rewrote; files the previous
    /// install left behind would otherwise lose their owner.
    pub fn absorb(&mut self, previous: &InstallManifest, prefix: &Path) {
        let known: BTreeSet<PathBuf> = self.entries.iter().map(|e| e.path.clone()).collect();
        let carried = previous
            .entries
            .iter()
            .filter(|e| !known.contains(&e.path))
            .filter(|e| std::fs::symlink_metadata(prefix.join(&e.path)).is_ok())
            .cloned();
        self.entries.extend(carried);
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Write the manifest as JSON
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ManifestError::Serialize {
                name: self.name.clone(),
                error: e.to_string(),
            })?;
        filesystem::write_file(path, &content)?;
        Ok(())
    }

    /// Read a manifest; a missing file yields `None`
    pub fn load(path: &Path) -> Result<Option<Self>, ManifestError> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = filesystem::read_file(path)?;
        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| ManifestError::Corrupt {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        if let Some(bad) = manifest.entries.iter().find(|e| !is_plain_relative(&e.path)) {
            return Err(ManifestError::Corrupt {
                path: path.to_path_buf(),
                error: format!("entry '{}' escapes the install prefix", bad.path.display()),
            });
        }
        Ok(Some(manifest))
    }

    /// Read every manifest in `dir`
    pub fn load_all(dir: &Path) -> Result<Vec<Self>, ManifestError> {
        let Ok(read_dir) = std::fs::read_dir(dir) else {
            return Ok(Vec::new());
        };
        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut manifests = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(manifest) = Self::load(&path)? {
                manifests.push(manifest);
            }
        }
        Ok(manifests)
    }

    /// Recorded files whose content no longer matches the install-time digest
    pub fn modified_files(&self, prefix: &Path) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let expected = entry.sha256.as_ref()?;
                let path = prefix.join(&entry.path);
                match file_digest(&path) {
                    Ok(actual) if &actual != expected => Some(path),
                    _ => None,
                }
            })
            .collect()
    }

    /// Queue this manifest's paths for removal from `prefix`
    ///
    /// Paths recorded by any of `others` are skipped. Files and symlinks come
    /// first; directories follow deepest-first and are only removed when
    /// empty. Parent directories of removed paths that no other manifest
    /// records are queued too, so a directory created by a dependency that was
    /// cleaned earlier does not outlive its last user. Returns the number of
    /// skipped shared paths.
    pub fn plan_removal(
        &self,
        prefix: &Path,
        others: &[InstallManifest],
        plan: &mut RemovalPlan,
    ) -> usize {
        let claimed: BTreeSet<&Path> = others
            .iter()
            .filter(|m| m.name != self.name)
            .flat_map(|m| m.entries.iter().map(|e| e.path.as_path()))
            .collect();

        let mut shared = 0;
        let mut dirs: BTreeMap<&Path, &'static str> = BTreeMap::new();
        for entry in &self.entries {
            if claimed.contains(entry.path.as_path()) {
                tracing::debug!(
                    "Keeping {} ({} also installed it)",
                    entry.path.display(),
                    self.name
                );
                shared += 1;
                continue;
            }
            match entry.kind {
                EntryKind::File | EntryKind::Symlink => {
                    plan.push(prefix.join(&entry.path), RemovalKind::File, "installed file");
                }
                EntryKind::Dir => {
                    dirs.insert(&entry.path, "installed directory");
                }
            }
        }

        let removed: Vec<&Path> = self
            .entries
            .iter()
            .map(|e| e.path.as_path())
            .filter(|p| !claimed.contains(p))
            .collect();
        for path in removed {
            for parent in path.ancestors().skip(1) {
                if parent.as_os_str().is_empty() || claimed.contains(parent) {
                    break;
                }
                dirs.entry(parent).or_insert("emptied parent directory");
            }
        }

        let mut dirs: Vec<(&Path, &'static str)> = dirs.into_iter().collect();
        dirs.sort_by_key(|(p, _)| std::cmp::Reverse(p.components().count()));
        for (dir, reason) in dirs {
            plan.push(prefix.join(dir), RemovalKind::EmptyDir, reason);
        }
        shared
    }
}

fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn file_digest(path: &Path) -> Result<String, FilesystemError> {
    let read_error = |e: std::io::Error| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(read_error)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(read_error)?;
    Ok(hex::encode(hasher.finalize()))
}
