//! CLI command implementations
//!
//! Each action is implemented in its own submodule and visits the selected
//! dependencies in declaration order, stopping at the first failure.

pub mod clean;
pub mod download;
pub mod install;

use std::fmt;

/// Action applied to every selected dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    /// Clone sources and check out the configured branch and commit
    Download,
    /// Configure, build and install into the shared prefix
    Install,
    /// Remove build trees, installed files, sources and logs
    Clean,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::Install => "install",
            Self::Clean => "clean",
        })
    }
}
