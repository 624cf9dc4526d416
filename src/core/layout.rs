//! Directory layout
//!
//! Every path depbuild touches is derived from a single root and the build
//! variant (`<compiler>-<sanitizer>`):
//!
//! ```text
//! <root>/
//! ├── logs/                 main.log and <name>.log
//! ├── sources/<name>/       cloned repositories (shared by all variants)
//! ├── build/<variant>/<name>/
//! ├── install/<variant>/    shared install prefix
//! └── manifests/<variant>/  <name>.json install manifests
//! ```
//!
//! The layout is resolved once at startup and passed to every operation.

use std::path::{Path, PathBuf};

use crate::config::defaults::MAIN_LOG_FILE;
use crate::core::build_env::{Compiler, Sanitizer};
use crate::core::removal::normalize;
use crate::error::FilesystemError;
use crate::infra::filesystem;

const LOGS_SUBDIR: &str = "logs";
const SOURCES_SUBDIR: &str = "sources";
const BUILD_SUBDIR: &str = "build";
const INSTALL_SUBDIR: &str = "install";
const MANIFESTS_SUBDIR: &str = "manifests";

/// Resolved directory layout for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    variant: String,
    shared_memory: PathBuf,
}

impl Layout {
    /// Create a layout for `root` and the given build variant
    ///
    /// `root` and `shared_memory` are normalized lexically; relative paths are
    /// resolved against `cwd`.
    pub fn new(
        root: &Path,
        cwd: &Path,
        compiler: Compiler,
        sanitizer: Sanitizer,
        shared_memory: &Path,
    ) -> Self {
        Self {
            root: absolutize(root, cwd),
            variant: Self::variant_name(compiler, sanitizer),
            shared_memory: absolutize(shared_memory, cwd),
        }
    }

    /// Variant directory name for a compiler and sanitizer
    pub fn variant_name(compiler: Compiler, sanitizer: Sanitizer) -> String {
        format!("{}-{}", compiler.label(), sanitizer.label())
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Variant name
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Directory holding all log files
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_SUBDIR)
    }

    /// Directory holding all cloned sources
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(SOURCES_SUBDIR)
    }

    /// Directory holding this variant's build trees
    pub fn build_root(&self) -> PathBuf {
        self.root.join(BUILD_SUBDIR).join(&self.variant)
    }

    /// Shared install prefix of this variant
    pub fn install_prefix(&self) -> PathBuf {
        self.root.join(INSTALL_SUBDIR).join(&self.variant)
    }

    /// Directory holding this variant's install manifests
    pub fn manifests_dir(&self) -> PathBuf {
        self.root.join(MANIFESTS_SUBDIR).join(&self.variant)
    }

    /// Shared-memory directory scanned for residue
    pub fn shared_memory_dir(&self) -> &Path {
        &self.shared_memory
    }

    /// Source tree of a dependency
    pub fn source_dir(&self, name: &str) -> PathBuf {
        self.sources_dir().join(name)
    }

    /// Build tree of a dependency
    pub fn build_dir(&self, name: &str) -> PathBuf {
        self.build_root().join(name)
    }

    /// Log file capturing a dependency's external tool output
    pub fn log_file(&self, name: &str) -> PathBuf {
        self.logs_dir().join(format!("{name}.log"))
    }

    /// Install manifest of a dependency
    pub fn manifest_file(&self, name: &str) -> PathBuf {
        self.manifests_dir().join(format!("{name}.json"))
    }

    /// Log file for depbuild's own messages
    pub fn main_log(&self) -> PathBuf {
        self.logs_dir().join(MAIN_LOG_FILE)
    }

    /// Directories that must exist before any operation runs
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.logs_dir(),
            self.sources_dir(),
            self.build_root(),
            self.install_prefix(),
            self.manifests_dir(),
        ]
    }

    /// Create every required directory that is missing
    pub fn ensure(&self) -> Result<(), FilesystemError> {
        for dir in self.required_dirs() {
            if !dir.is_dir() {
                filesystem::create_dir_all(&dir)?;
                tracing::debug!("Created {}", dir.display());
            }
        }
        Ok(())
    }

    /// Directories under which clean may delete anything
    pub fn removal_roots(&self) -> Vec<PathBuf> {
        vec![self.root.clone(), self.shared_memory.clone()]
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize(&joined).unwrap_or(joined)
}
