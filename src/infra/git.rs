//! Git operations
//!
//! Clones repositories and checks out refs by running the git client, with
//! all output captured in the dependency's log file.

use std::fmt;
use std::path::Path;

use crate::error::CommandError;
use crate::infra::process::{Invocation, LogFile};

/// Git reference type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    /// Git branch (e.g., "main")
    Branch(String),
    /// Git commit SHA (e.g., "abc123...")
    Rev(String),
}

impl GitRef {
    /// Get the reference string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Branch(s) | Self::Rev(s) => s,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(s) => write!(f, "branch:{s}"),
            Self::Rev(s) => write!(f, "rev:{s}"),
        }
    }
}

/// Git client wrapper
#[derive(Debug, Clone)]
pub struct GitClient {
    program: String,
}

impl GitClient {
    /// Create a client running `program`
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Program this client runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Clone `url` into the existing, empty directory `dest`
    pub async fn clone_into(
        &self,
        url: &str,
        dest: &Path,
        log: &LogFile,
    ) -> Result<(), CommandError> {
        self.invocation(vec!["clone".to_string(), url.to_string(), ".".to_string()], dest)
            .run(log)
            .await
    }

    /// Check out `git_ref` in the repository at `repo`
    pub async fn checkout(
        &self,
        repo: &Path,
        git_ref: &GitRef,
        log: &LogFile,
    ) -> Result<(), CommandError> {
        self.invocation(vec!["checkout".to_string(), git_ref.as_str().to_string()], repo)
            .run(log)
            .await
    }

    fn invocation<'a>(&'a self, args: Vec<String>, cwd: &'a Path) -> Invocation<'a> {
        Invocation {
            program: &self.program,
            args,
            cwd,
            env: None,
        }
    }
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new(crate::config::defaults::DEFAULT_GIT)
    }
}
