//! Build environment setup
//!
//! Composes the environment every generator and executor invocation runs in:
//! compiler pair, build type, sanitizer flags and the search paths that make
//! previously installed dependencies visible to the next build.
//!
//! Construction is a pure function of compiler, sanitizer, install prefix and
//! the base environment it is applied to.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::defaults::DEFAULT_CLANG_VERSION;

/// Search-path separator
const PATH_SEPARATOR: &str = ":";

/// C/C++ compiler family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Compiler {
    /// GNU compilers from PATH
    #[default]
    Gcc,
    /// Clang, pinned to a major version
    Clang,
}

impl Compiler {
    /// Short label used in variant names
    pub fn label(self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
        }
    }

    /// C compiler command
    pub fn cc(self, clang_version: u32) -> String {
        match self {
            Self::Gcc => "gcc".to_string(),
            Self::Clang => format!("clang-{clang_version}"),
        }
    }

    /// C++ compiler command
    pub fn cxx(self, clang_version: u32) -> String {
        match self {
            Self::Gcc => "g++".to_string(),
            Self::Clang => format!("clang++-{clang_version}"),
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sanitizer instrumentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Sanitizer {
    /// No instrumentation, debug info only
    #[default]
    None,
    /// ThreadSanitizer
    #[value(alias = "tsan")]
    Thread,
    /// AddressSanitizer combined with UndefinedBehaviorSanitizer
    #[value(alias = "asan")]
    Address,
    /// UndefinedBehaviorSanitizer alone
    #[value(alias = "ubsan")]
    Undefined,
}

impl Sanitizer {
    /// Short label used in variant names
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thread => "thread",
            Self::Address => "address",
            Self::Undefined => "undefined",
        }
    }

    /// `-fsanitize` flags shared by compile and link steps
    fn sanitize_flags(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Thread => "-fsanitize=thread",
            Self::Address => "-fsanitize=address -fsanitize=undefined",
            Self::Undefined => "-fsanitize=undefined",
        }
    }

    /// Value for `CFLAGS` and `CXXFLAGS`
    pub fn compile_flags(self) -> String {
        match self.sanitize_flags() {
            "" => "-g".to_string(),
            flags => format!("{flags} -g"),
        }
    }

    /// Value for `LDFLAGS`
    pub fn link_flags(self) -> String {
        self.sanitize_flags().to_string()
    }
}

impl fmt::Display for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build environment for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildEnvironment {
    /// Compiler family
    pub compiler: Compiler,
    /// Sanitizer selection
    pub sanitizer: Sanitizer,
    /// Pinned clang major version
    pub clang_version: u32,
    /// Shared install prefix
    pub install_prefix: PathBuf,
}

impl BuildEnvironment {
    /// Create an environment for the given compiler, sanitizer and prefix
    pub fn new(compiler: Compiler, sanitizer: Sanitizer, install_prefix: PathBuf) -> Self {
        Self {
            compiler,
            sanitizer,
            clang_version: DEFAULT_CLANG_VERSION,
            install_prefix,
        }
    }

    /// Pin a different clang version
    #[must_use]
    pub fn with_clang_version(mut self, version: u32) -> Self {
        self.clang_version = version;
        self
    }

    /// Variables set regardless of the base environment
    pub fn overrides(&self) -> BTreeMap<String, String> {
        let compile_flags = self.sanitizer.compile_flags();
        BTreeMap::from([
            ("CC".to_string(), self.compiler.cc(self.clang_version)),
            ("CXX".to_string(), self.compiler.cxx(self.clang_version)),
            ("CMAKE_BUILD_TYPE".to_string(), "Debug".to_string()),
            ("CMAKE_EXPORT_COMPILE_COMMANDS".to_string(), "YES".to_string()),
            ("CFLAGS".to_string(), compile_flags.clone()),
            ("CXXFLAGS".to_string(), compile_flags),
            ("LDFLAGS".to_string(), self.sanitizer.link_flags()),
        ])
    }

    /// Overlay this environment on `base` and return the result
    ///
    /// Search paths get the prefix directories prepended. Existing non-empty
    /// values are kept after them; an empty value is treated as unset so no
    /// empty path element is introduced.
    pub fn apply(&self, base: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut env = base.clone();
        env.extend(self.overrides());

        let prefix = &self.install_prefix;
        let search_paths = [
            ("PATH", vec![sub(prefix, "bin"), sub(prefix, "share")]),
            ("LD_LIBRARY_PATH", vec![sub(prefix, "lib")]),
            ("PKG_CONFIG_PATH", vec![sub(prefix, "lib/pkgconfig")]),
        ];
        for (key, entries) in search_paths {
            let value = prepend(&entries, base.get(key).map(String::as_str));
            env.insert(key.to_string(), value);
        }

        env
    }

    /// Overlay this environment on the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are dropped.
    pub fn apply_to_process(&self) -> BTreeMap<String, String> {
        let base: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        self.apply(&base)
    }

    /// Check the environment is usable
    pub fn validate(&self) -> Result<(), BuildEnvError> {
        if !self.install_prefix.is_absolute() {
            return Err(BuildEnvError::InvalidValue {
                variable: "install prefix".to_string(),
                reason: format!("'{}' is not absolute", self.install_prefix.display()),
            });
        }
        if self.compiler == Compiler::Clang && self.clang_version == 0 {
            return Err(BuildEnvError::InvalidValue {
                variable: "clang version".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn sub(prefix: &Path, dir: &str) -> String {
    prefix.join(dir).display().to_string()
}

fn prepend(entries: &[String], existing: Option<&str>) -> String {
    let mut parts: Vec<&str> = entries.iter().map(String::as_str).collect();
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        parts.push(existing);
    }
    parts.join(PATH_SEPARATOR)
}

/// Build environment errors
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEnvError {
    /// Variable has invalid value
    InvalidValue { variable: String, reason: String },
}

impl fmt::Display for BuildEnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { variable, reason } => {
                write!(f, "Invalid value for {variable}: {reason}")
            }
        }
    }
}

impl std::error::Error for BuildEnvError {}
