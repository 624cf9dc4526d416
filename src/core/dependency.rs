//! Dependency file parsing
//!
//! The dependency file is a YAML mapping from dependency name to its
//! descriptor:
//!
//! ```yaml
//! libyang:
//!   url: https://github.com/CESNET/libyang.git
//!   branch: devel
//!   build_args: ["-DENABLE_TESTS=OFF"]
//! sysrepo:
//!   url: https://github.com/sysrepo/sysrepo.git
//!   branch: devel
//!   commit: 5c2b7bd
//!   shared_memory: true
//! ```
//!
//! Declaration order is kept; it is the order in which `all` and
//! `dependencies` visit entries.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::defaults::MAIN_LOG_NAME;
use crate::error::ConfigError;

/// Target names with a fixed meaning that cannot be used as dependency names
pub const RESERVED_NAMES: &[&str] = &["all", "dependencies"];

/// What an entry represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// A prerequisite library or tool
    #[default]
    Dependency,
    /// The project being developed on top of the dependencies
    Project,
}

/// On-disk shape of one entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependencyEntry {
    url: String,
    branch: String,
    #[serde(default)]
    commit: Option<String>,
    #[serde(default)]
    build_args: Vec<String>,
    #[serde(default)]
    kind: DependencyKind,
    #[serde(default)]
    keep_source: bool,
    #[serde(default)]
    shared_memory: bool,
}

/// A dependency descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Unique name, also the directory name under sources/build/logs
    pub name: String,
    /// Repository URL
    pub url: String,
    /// Branch checked out after clone
    pub branch: String,
    /// Commit checked out after the branch, if pinned
    pub commit: Option<String>,
    /// Extra generator arguments
    pub build_args: Vec<String>,
    /// Dependency or project
    pub kind: DependencyKind,
    /// Clean leaves the source tree in place
    pub keep_source: bool,
    /// Clean removes matching entries from the shared-memory directory
    pub shared_memory: bool,
}

impl Dependency {
    /// Create a plain dependency with no build arguments
    pub fn new(name: &str, url: &str, branch: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            branch: branch.to_string(),
            commit: None,
            build_args: Vec::new(),
            kind: DependencyKind::Dependency,
            keep_source: false,
            shared_memory: false,
        }
    }

    fn from_entry(name: String, entry: DependencyEntry) -> Result<Self, ConfigError> {
        if entry.url.trim().is_empty() {
            return Err(ConfigError::InvalidEntry {
                name,
                error: "url must not be empty".to_string(),
            });
        }
        if entry.branch.trim().is_empty() {
            return Err(ConfigError::InvalidEntry {
                name,
                error: "branch must not be empty".to_string(),
            });
        }
        Ok(Self {
            name,
            url: entry.url,
            branch: entry.branch,
            commit: entry.commit.filter(|c| !c.trim().is_empty()),
            build_args: entry.build_args,
            kind: entry.kind,
            keep_source: entry.keep_source,
            shared_memory: entry.shared_memory,
        })
    }
}

/// Why `name` cannot be used for a dependency, if it cannot
///
/// The name becomes a directory and file name under the build root, so it
/// must not escape its parent or collide with the main log.
fn name_conflict(name: &str) -> Option<&'static str> {
    if RESERVED_NAMES.contains(&name) {
        Some("reserved for target selection")
    } else if name == MAIN_LOG_NAME {
        Some("its log file would be the main log")
    } else if matches!(name, "." | "..") || name.contains(['/', '\\']) {
        Some("names must not be paths")
    } else {
        None
    }
}

/// All dependencies of a dependency file, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: Vec<Dependency>,
}

impl DependencySet {
    /// Load the dependency file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_yaml(&content, path)
    }

    /// Parse dependency file content; `path` is used for error messages only
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_error = |error: String| ConfigError::ParseError {
            path: path.to_path_buf(),
            error,
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let serde_yaml::Value::Mapping(mapping) = value else {
            return Err(parse_error(
                "expected a mapping of dependency names to descriptors".to_string(),
            ));
        };

        let mut entries: Vec<Dependency> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key.as_str() {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => {
                    return Err(ConfigError::InvalidName {
                        found: format!("{key:?}"),
                        reason: "names must be non-empty strings".to_string(),
                    })
                }
            };
            if let Some(reason) = name_conflict(&name) {
                return Err(ConfigError::InvalidName {
                    found: format!("'{name}'"),
                    reason: reason.to_string(),
                });
            }
            let entry: DependencyEntry =
                serde_yaml::from_value(value).map_err(|e| ConfigError::InvalidEntry {
                    name: name.clone(),
                    error: e.to_string(),
                })?;
            entries.push(Dependency::from_entry(name, entry)?);
        }

        tracing::debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Build a set directly from descriptors
    pub fn from_dependencies(entries: Vec<Dependency>) -> Self {
        Self { entries }
    }

    /// Look up a dependency by name
    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.entries.iter().find(|d| d.name == name)
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    /// Names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.name.clone()).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file declared no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
