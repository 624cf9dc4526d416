//! Settings management
//!
//! Reads machine-specific settings from `config.toml` in the config directory
//! (or an explicit path). Settings cover the build root, the external tools,
//! the pinned clang version, default job count and the shared-memory
//! directory scanned by clean.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::SettingsError;

/// Machine-wide settings for depbuild
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Root directory holding sources, build trees, install prefixes and logs
    pub root: Option<PathBuf>,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Compiler settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Default build options
    #[serde(default)]
    pub build: BuildConfig,

    /// Well-known system paths
    #[serde(default)]
    pub paths: PathsConfig,
}

/// External tool names and fixed arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Version control client
    pub git: Option<String>,

    /// Build-file generator
    pub generator: Option<String>,

    /// Build executor
    pub executor: Option<String>,

    /// Arguments selecting the executor backend (default `-GNinja`)
    pub generator_args: Option<Vec<String>>,

    /// Arguments passed to the generator for every dependency
    #[serde(default)]
    pub extra_generator_args: Vec<String>,
}

/// Compiler settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Pinned clang major version
    pub clang_version: Option<u32>,
}

/// Default build options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Default number of parallel jobs
    pub jobs: Option<usize>,
}

/// Well-known system paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Shared-memory directory
    pub shared_memory: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a specific path
    ///
    /// If the file doesn't exist, returns default settings.
    /// If the file exists but is invalid, returns an error.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Get the effective git command
    #[must_use]
    pub fn git(&self) -> &str {
        self.tools.git.as_deref().unwrap_or(defaults::DEFAULT_GIT)
    }

    /// Get the effective generator command
    #[must_use]
    pub fn generator(&self) -> &str {
        self.tools
            .generator
            .as_deref()
            .unwrap_or(defaults::DEFAULT_GENERATOR)
    }

    /// Get the effective executor command
    #[must_use]
    pub fn executor(&self) -> &str {
        self.tools
            .executor
            .as_deref()
            .unwrap_or(defaults::DEFAULT_EXECUTOR)
    }

    /// Get the effective generator backend arguments
    #[must_use]
    pub fn generator_args(&self) -> Vec<String> {
        match &self.tools.generator_args {
            Some(args) => args.clone(),
            None => defaults::DEFAULT_GENERATOR_ARGS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Get the effective clang version
    #[must_use]
    pub fn clang_version(&self) -> u32 {
        self.toolchain
            .clang_version
            .unwrap_or(defaults::DEFAULT_CLANG_VERSION)
    }

    /// Get the effective number of build jobs
    ///
    /// Falls back to the number of CPUs.
    #[must_use]
    pub fn build_jobs(&self) -> usize {
        self.build.jobs.unwrap_or_else(num_cpus::get)
    }

    /// Get the effective shared-memory directory
    #[must_use]
    pub fn shared_memory_dir(&self) -> PathBuf {
        self.paths
            .shared_memory
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_SHARED_MEMORY_DIR))
    }
}
