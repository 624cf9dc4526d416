//! Default configuration values

/// Application name used in directory paths
pub const APP_NAME: &str = "depbuild";

/// Default dependency file, relative to the working directory
pub const DEFAULT_DEPENDENCY_FILE: &str = "dependencies.yaml";

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "config.toml";

/// Pinned clang major version used for `--compiler clang`
pub const DEFAULT_CLANG_VERSION: u32 = 17;

/// Version control client
pub const DEFAULT_GIT: &str = "git";

/// Build-file generator
pub const DEFAULT_GENERATOR: &str = "cmake";

/// Build executor
pub const DEFAULT_EXECUTOR: &str = "ninja";

/// Arguments selecting the executor's backend in the generator
pub const DEFAULT_GENERATOR_ARGS: &[&str] = &["-GNinja"];

/// Transient shared-memory directory scanned by clean
pub const DEFAULT_SHARED_MEMORY_DIR: &str = "/dev/shm";

/// Stem of the main log file; a dependency with this name would share it
pub const MAIN_LOG_NAME: &str = "main";

/// Main log file name inside the logs directory
pub const MAIN_LOG_FILE: &str = "main.log";

/// File the generator writes after a successful install
pub const GENERATOR_INSTALL_MANIFEST: &str = "install_manifest.txt";
