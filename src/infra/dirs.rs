//! Platform-specific directory management
//!
//! Provides the default locations of the settings file and of the build root
//! when neither the command line nor the settings file name one.
//!
//! Environment variables can override default directories:
//! - `DEPBUILD_CONFIG_DIR` - Override config directory
//! - `DEPBUILD_DATA_DIR` - Override data directory (the default build root)

use std::env;
use std::path::PathBuf;

use crate::config::defaults::{APP_NAME, SETTINGS_FILE};

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "DEPBUILD_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "DEPBUILD_DATA_DIR";

/// Platform-specific directory provider for depbuild
#[derive(Debug, Clone)]
pub struct DepbuildDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl DepbuildDirs {
    /// Create a new `DepbuildDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            data_dir: Self::resolve_data_dir(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/depbuild` or `~/.config/depbuild`
    /// - macOS: `~/Library/Application Support/depbuild`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the data directory path
    ///
    /// Used as the build root when none is configured.
    /// - Linux: `$XDG_DATA_HOME/depbuild` or `~/.local/share/depbuild`
    /// - macOS: `~/Library/Application Support/depbuild`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Get the settings file path
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_DATA_DIR) {
            return PathBuf::from(path);
        }

        dirs::data_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".local").join("share").join(APP_NAME))
                    .unwrap_or_else(|| {
                        PathBuf::from(".")
                            .join(".local")
                            .join("share")
                            .join(APP_NAME)
                    })
            })
    }
}

impl Default for DepbuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
