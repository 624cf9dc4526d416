//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    use crate::config::defaults::MAIN_LOG_NAME;
    use crate::core::build_env::{Compiler, Sanitizer};
    use crate::core::dependency::RESERVED_NAMES;

    /// Generate a valid dependency name (lowercase alphanumeric with hyphens)
    pub fn dependency_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,20}[a-z0-9]?".prop_filter("Name must not be reserved", |s| {
            !s.is_empty() && !RESERVED_NAMES.contains(&s.as_str()) && s != MAIN_LOG_NAME
        })
    }

    /// Generate an absolute install prefix
    pub fn install_prefix() -> impl Strategy<Value = String> {
        "(/[a-z0-9_-]{1,10}){1,4}"
    }

    /// Generate a colon-separated search path
    pub fn search_path() -> impl Strategy<Value = String> {
        proptest::collection::vec("/[a-z]{1,8}(/[a-z]{1,8}){0,2}", 1..4)
            .prop_map(|parts| parts.join(":"))
    }

    /// Generate a compiler choice
    pub fn compiler() -> impl Strategy<Value = Compiler> {
        prop_oneof![Just(Compiler::Gcc), Just(Compiler::Clang)]
    }

    /// Generate a sanitizer choice
    pub fn sanitizer() -> impl Strategy<Value = Sanitizer> {
        prop_oneof![
            Just(Sanitizer::None),
            Just(Sanitizer::Thread),
            Just(Sanitizer::Address),
            Just(Sanitizer::Undefined),
        ]
    }

    /// Generate a base environment with optional search-path variables
    pub fn base_environment() -> impl Strategy<Value = BTreeMap<String, String>> {
        (
            proptest::option::of(search_path()),
            proptest::option::of(search_path()),
            proptest::option::of(search_path()),
            proptest::collection::btree_map("[A-Z][A-Z_]{0,8}", "[a-z0-9]{0,8}", 0..4),
        )
            .prop_map(|(path, ld, pkg, mut extra)| {
                for (key, value) in [
                    ("PATH", path),
                    ("LD_LIBRARY_PATH", ld),
                    ("PKG_CONFIG_PATH", pkg),
                ] {
                    match value {
                        Some(value) => {
                            extra.insert(key.to_string(), value);
                        }
                        None => {
                            extra.remove(key);
                        }
                    }
                }
                extra
            })
    }
}

#[cfg(all(test, unix))]
#[path = "../tests/common/fake_tools.rs"]
mod fake_tools;

/// Temporary build roots with scripted stand-ins for git, cmake and ninja
#[cfg(all(test, unix))]
pub mod fixtures {
    use std::collections::BTreeMap;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::core::build_env::{BuildEnvironment, Compiler, Sanitizer};
    use crate::core::context::Context;
    use crate::core::layout::Layout;
    use crate::core::settings::{PathsConfig, Settings, ToolsConfig};

    pub use super::fake_tools::FakeTools;

    /// Temporary directory holding a build root, fake tools and a shared-memory dir
    pub struct TestRoot {
        /// Backing directory
        pub dir: TempDir,
    }

    impl TestRoot {
        /// Create a new temporary root
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().expect("Failed to create temp directory"),
            }
        }

        /// Build root
        pub fn root(&self) -> PathBuf {
            self.dir.path().join("root")
        }

        /// Shared-memory stand-in
        pub fn shared_memory(&self) -> PathBuf {
            self.dir.path().join("shm")
        }

        fn write_tool(&self, name: &str, script: &str) -> String {
            let path = self.dir.path().join("tools").join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.display().to_string()
        }

        /// Settings pointing at freshly written fake tools
        pub fn settings(&self, tools: &FakeTools) -> Settings {
            Settings {
                root: Some(self.root()),
                tools: ToolsConfig {
                    git: Some(self.write_tool("git", &tools.git_script())),
                    generator: Some(self.write_tool("cmake", &tools.generator_script())),
                    executor: Some(self.write_tool("ninja", &tools.executor_script())),
                    generator_args: None,
                    extra_generator_args: Vec::new(),
                },
                paths: PathsConfig {
                    shared_memory: Some(self.shared_memory()),
                },
                ..Settings::default()
            }
        }

        /// Context for gcc without sanitizer, directories created
        pub fn context(&self, tools: &FakeTools) -> Context {
            let settings = self.settings(tools);
            std::fs::create_dir_all(self.shared_memory()).unwrap();
            let layout = Layout::new(
                &self.root(),
                Path::new("/"),
                Compiler::Gcc,
                Sanitizer::None,
                &self.shared_memory(),
            );
            layout.ensure().unwrap();
            let build_env =
                BuildEnvironment::new(Compiler::Gcc, Sanitizer::None, layout.install_prefix());
            let base = BTreeMap::from([(
                "PATH".to_string(),
                std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string()),
            )]);
            Context::new(layout, settings, build_env, &base, 3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MAIN_LOG_NAME;
    use crate::core::dependency::RESERVED_NAMES;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_dependency_name_generator(name in dependency_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!RESERVED_NAMES.contains(&name.as_str()) && name != MAIN_LOG_NAME);
            prop_assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_install_prefix_generator(prefix in install_prefix()) {
            prop_assert!(prefix.starts_with('/'));
            prop_assert!(!prefix.ends_with('/'));
        }
    }
}
