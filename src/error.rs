//! Error types for depbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Dependency file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Dependency file does not exist
    #[error("Dependency file not found: {path}")]
    NotFound { path: PathBuf },

    /// Dependency file could not be read
    #[error("Failed to read dependency file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Dependency file is not valid YAML or has the wrong shape
    #[error("Failed to parse dependency file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// A single entry is malformed
    #[error("Invalid entry '{name}' in dependency file: {error}")]
    InvalidEntry { name: String, error: String },

    /// Mapping key cannot name a dependency
    #[error("Invalid dependency name {found}: {reason}")]
    InvalidName { found: String, reason: String },

    /// Requested target is not a known name or category
    #[error("Unknown target '{target}'. Available: all, dependencies, {}", available.join(", "))]
    UnknownTarget {
        target: String,
        available: Vec<String>,
    },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// External command errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Program not found on PATH
    #[error("Required tool '{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    /// Process could not be started
    #[error("Failed to run '{program}': {error}. See {} for more details", log.display())]
    SpawnFailed {
        program: String,
        error: String,
        log: PathBuf,
    },

    /// Process exited with a non-zero status
    #[error(
        "'{command}' failed with {}. See {} for more details",
        describe_code(*code),
        log.display()
    )]
    Failed {
        command: String,
        code: Option<i32>,
        log: PathBuf,
    },

    /// Log file could not be opened
    #[error("Failed to open log file '{path}': {error}")]
    LogFile { path: PathBuf, error: String },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to walk a directory tree
    #[error("Failed to scan '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Install manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest could not be parsed
    #[error("Corrupt install manifest '{path}': {error}")]
    Corrupt { path: PathBuf, error: String },

    /// Manifest could not be serialized
    #[error("Failed to serialize install manifest for '{name}': {error}")]
    Serialize { name: String, error: String },

    /// Underlying filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Removal plan errors
#[derive(Error, Debug)]
pub enum RemovalError {
    /// Path is outside every allowed root
    #[error("Refusing to remove '{path}': outside of the managed directories")]
    OutsideRoots { path: PathBuf },

    /// Path is one of the allowed roots itself
    #[error("Refusing to remove managed root '{path}'")]
    IsRoot { path: PathBuf },

    /// Path is relative or contains parent components
    #[error("Refusing to remove '{path}': path must be absolute and normalized")]
    NotNormalized { path: PathBuf },

    /// Underlying filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Top-level depbuild error type
#[derive(Error, Debug)]
pub enum DepbuildError {
    /// Dependency file error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// External command error
    #[error("{0}")]
    Command(#[from] CommandError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Removal error
    #[error("Clean error: {0}")]
    Removal(#[from] RemovalError),

    /// Source tree missing before install
    #[error("Source for '{name}' not found at '{path}'. Run with --action download first")]
    NotDownloaded { name: String, path: PathBuf },
}
