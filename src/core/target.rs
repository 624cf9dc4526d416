//! Target selection
//!
//! A target picks which entries of the dependency file an action visits.
//! Every selection yields entries in declaration order, so a named target runs
//! exactly the per-entry sequence that `all` would run for that entry.

use std::fmt;

use crate::core::dependency::{Dependency, DependencyKind, DependencySet};
use crate::error::ConfigError;

/// Which entries an action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every entry, projects included
    All,
    /// Every entry of kind `dependency`
    Dependencies,
    /// A single entry by name
    Named(String),
}

impl Target {
    /// Parse a target from its command-line spelling
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "dependencies" => Self::Dependencies,
            name => Self::Named(name.to_string()),
        }
    }

    /// Resolve the target against a dependency set
    pub fn select<'a>(&self, set: &'a DependencySet) -> Result<Vec<&'a Dependency>, ConfigError> {
        match self {
            Self::All => Ok(set.iter().collect()),
            Self::Dependencies => Ok(set
                .iter()
                .filter(|d| d.kind == DependencyKind::Dependency)
                .collect()),
            Self::Named(name) => {
                set.get(name)
                    .map(|d| vec![d])
                    .ok_or_else(|| ConfigError::UnknownTarget {
                        target: name.clone(),
                        available: set.names(),
                    })
            }
        }
    }

    /// Whether this target covers the whole dependency file
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Dependencies => write!(f, "dependencies"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
