//! External process execution
//!
//! Every external tool runs to completion with its combined output appended to
//! a per-dependency log file. A non-zero exit becomes a [`CommandError`] that
//! points at that log file.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::CommandError;

/// Per-dependency log file receiving tool output
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: &Path) -> Result<Self, CommandError> {
        File::create(path).map_err(|e| CommandError::LogFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self) -> Result<File, CommandError> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| CommandError::LogFile {
                path: self.path.clone(),
                error: e.to_string(),
            })
    }
}

/// One external tool invocation
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// Program name or path
    pub program: &'a str,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: &'a Path,
    /// Complete environment; `None` inherits the process environment
    pub env: Option<&'a BTreeMap<String, String>>,
}

impl Invocation<'_> {
    /// Command line as shown in logs and errors
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, appending stdout and stderr to `log`
    pub async fn run(&self, log: &LogFile) -> Result<(), CommandError> {
        let command_line = self.command_line();
        tracing::debug!(cwd = %self.cwd.display(), "running {command_line}");

        let mut stdout = log.append()?;
        writeln!(stdout, "$ {command_line}").map_err(|e| CommandError::LogFile {
            path: log.path().to_path_buf(),
            error: e.to_string(),
        })?;
        let stderr = stdout.try_clone().map_err(|e| CommandError::LogFile {
            path: log.path().to_path_buf(),
            error: e.to_string(),
        })?;

        let mut command = Command::new(self.program);
        command
            .args(&self.args)
            .current_dir(self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        if let Some(env) = self.env {
            command.env_clear().envs(env);
        }

        let status = command
            .status()
            .await
            .map_err(|e| CommandError::SpawnFailed {
                program: self.program.to_string(),
                error: e.to_string(),
                log: log.path().to_path_buf(),
            })?;

        if !status.success() {
            return Err(CommandError::Failed {
                command: command_line,
                code: status.code(),
                log: log.path().to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Locate `tool` on the `PATH` of `env` (or of the process when `None`)
pub fn find_tool(
    tool: &str,
    env: Option<&BTreeMap<String, String>>,
    cwd: &Path,
) -> Result<PathBuf, CommandError> {
    let search_path = match env {
        Some(env) => env.get("PATH").map(std::ffi::OsString::from),
        None => std::env::var_os("PATH"),
    };
    which::which_in(tool, search_path, cwd).map_err(|_| CommandError::ToolNotFound {
        tool: tool.to_string(),
    })
}
