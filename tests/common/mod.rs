//! Common test utilities and helpers
//!
//! Integration tests run the real binary against the shell-script tools of
//! `fake_tools`.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};

use assert_fs::TempDir;

mod fake_tools;

pub use fake_tools::FakeTools;

/// Test project context
///
/// A temporary working directory holding the dependency file, a settings file
/// pointing at the fake tools, the build root and a shared-memory stand-in.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a project with tools that always succeed
    pub fn new() -> Self {
        Self::with_tools(&FakeTools::default())
    }

    /// Create a project with the given tool behaviour
    pub fn with_tools(tools: &FakeTools) -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        project.create_dir("shm");
        project.set_tools(tools);
        project
    }

    /// Rewrite the fake tools
    pub fn set_tools(&self, tools: &FakeTools) {
        for (name, script) in [
            ("git", tools.git_script()),
            ("cmake", tools.generator_script()),
            ("ninja", tools.executor_script()),
        ] {
            let path = self.path().join("tools").join(name);
            self.create_file(&format!("tools/{name}"), &script);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make tool executable");
        }
        let tools_dir = self.path().join("tools");
        self.create_file(
            "settings.toml",
            &format!(
                r#"root = "{root}"

[tools]
git = "{tools}/git"
generator = "{tools}/cmake"
executor = "{tools}/ninja"

[build]
jobs = 2

[paths]
shared_memory = "{shm}"
"#,
                root = self.root().display(),
                tools = tools_dir.display(),
                shm = self.shm().display(),
            ),
        );
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Build root
    pub fn root(&self) -> PathBuf {
        self.path().join("root")
    }

    /// Shared-memory stand-in
    pub fn shm(&self) -> PathBuf {
        self.path().join("shm")
    }

    /// Source tree of a dependency
    pub fn source(&self, name: &str) -> PathBuf {
        self.root().join("sources").join(name)
    }

    /// Build tree of a dependency for a variant
    pub fn build(&self, variant: &str, name: &str) -> PathBuf {
        self.root().join("build").join(variant).join(name)
    }

    /// Install prefix of a variant
    pub fn prefix(&self, variant: &str) -> PathBuf {
        self.root().join("install").join(variant)
    }

    /// Install manifest of a dependency for a variant
    pub fn manifest(&self, variant: &str, name: &str) -> PathBuf {
        self.root()
            .join("manifests")
            .join(variant)
            .join(format!("{name}.json"))
    }

    /// Per-dependency log file
    pub fn log(&self, name: &str) -> PathBuf {
        self.root().join("logs").join(format!("{name}.log"))
    }

    /// Write `dependencies.yaml`
    pub fn write_dependencies(&self, yaml: &str) {
        self.create_file("dependencies.yaml", yaml);
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create directory");
    }

    /// Read a file as lines
    pub fn read_lines(&self, path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .expect("Failed to read file")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run depbuild in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_depbuild"))
            .current_dir(self.path())
            .env("DEPBUILD_SETTINGS", self.path().join("settings.toml"))
            .env_remove("DEPBUILD_FILE")
            .env_remove("DEPBUILD_ROOT")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute depbuild")
    }

    /// Run an action on a target and assert it succeeds
    pub fn run_ok(&self, action: &str, target: &str) -> Output {
        let output = self.run(&["-a", action, "-t", target]);
        assert!(
            output.status.success(),
            "depbuild -a {action} -t {target} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Two libraries and one project
pub const SAMPLE_DEPENDENCIES: &str = r#"
foo:
  url: https://example.com/foo.git
  branch: main
  build_args: ["-DFOO=ON"]
bar:
  url: https://example.com/bar.git
  branch: devel
  commit: 5c2b7bd
app:
  url: https://example.com/app.git
  branch: main
  kind: project
  keep_source: true
"#;
