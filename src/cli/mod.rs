//! Command-line interface module
//!
//! Parses arguments, resolves settings and directories once, and hands the
//! selected dependencies to the requested action.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;

use crate::config::defaults::DEFAULT_DEPENDENCY_FILE;
use crate::core::build_env::{BuildEnvironment, Compiler, Sanitizer};
use crate::core::context::Context;
use crate::core::dependency::DependencySet;
use crate::core::layout::Layout;
use crate::core::settings::Settings;
use crate::core::target::Target;
use crate::infra::dirs::DepbuildDirs;

use commands::Action;
use output::OutputConfig;

/// depbuild - clone, build and install source dependencies into a shared prefix
#[derive(Parser, Debug)]
#[command(name = "depbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to run on the target
    #[arg(short, long, value_enum)]
    pub action: Action,

    /// `all`, `dependencies` or the name of one entry of the dependency file
    #[arg(short, long)]
    pub target: String,

    /// Compiler family
    #[arg(short, long, value_enum, default_value_t = Compiler::Gcc)]
    pub compiler: Compiler,

    /// Sanitizer instrumentation
    #[arg(short, long, value_enum, default_value_t = Sanitizer::None)]
    pub sanitizer: Sanitizer,

    /// Parallel build jobs (default: settings, else number of CPUs)
    #[arg(
        short,
        long,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub jobs: Option<usize>,

    /// Dependency file
    #[arg(short, long, env = "DEPBUILD_FILE", default_value = DEFAULT_DEPENDENCY_FILE)]
    pub file: PathBuf,

    /// Build root holding sources, build trees, install prefixes and logs
    #[arg(long, env = "DEPBUILD_ROOT")]
    pub root: Option<PathBuf>,

    /// Settings file
    #[arg(long, env = "DEPBUILD_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Print what clean would remove without removing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Output configuration from the verbosity flags
    pub fn output(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.verbose)
    }

    /// Execute the requested action
    pub async fn run(self) -> Result<()> {
        let output = self.output();
        let dirs = DepbuildDirs::new();
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;

        let settings_path = self.settings.clone().unwrap_or_else(|| dirs.settings_path());
        let settings = Settings::load_from_path(&settings_path)?;

        let root = self
            .root
            .clone()
            .or_else(|| settings.root.clone())
            .unwrap_or_else(|| dirs.data_dir());
        let layout = Layout::new(
            &root,
            &cwd,
            self.compiler,
            self.sanitizer,
            &settings.shared_memory_dir(),
        );
        layout
            .ensure()
            .with_context(|| format!("Failed to prepare build root {}", layout.root().display()))?;
        output::init_tracing(output, &layout.main_log())?;

        tracing::info!(
            "depbuild {}: action {}, target {}, variant {}, root {}",
            env!("CARGO_PKG_VERSION"),
            self.action,
            self.target,
            layout.variant(),
            layout.root().display()
        );
        if settings_path.is_file() {
            tracing::debug!("Loaded settings from {}", settings_path.display());
        }

        let file = cwd.join(&self.file);
        let dependencies = DependencySet::load(&file)?;
        let target = Target::parse(&self.target);
        let selected = target.select(&dependencies)?;
        tracing::debug!(
            "Selected {} of {} entries from {}",
            selected.len(),
            dependencies.len(),
            file.display()
        );

        let build_env =
            BuildEnvironment::new(self.compiler, self.sanitizer, layout.install_prefix())
                .with_clang_version(settings.clang_version());
        build_env.validate()?;
        let jobs = self.jobs.unwrap_or_else(|| settings.build_jobs()).max(1);
        let ctx = Context::from_process_env(layout, settings, build_env, jobs);

        if self.dry_run && self.action != Action::Clean {
            output.warning("--dry-run only applies to clean; ignoring it");
        }

        match self.action {
            Action::Download => commands::download::execute(&ctx, &selected, output).await,
            Action::Install => commands::install::execute(&ctx, &selected, output).await,
            Action::Clean => {
                commands::clean::execute(&ctx, &selected, &target, self.dry_run, output)
            }
        }
    }
}
