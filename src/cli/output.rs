//! Output formatting, progress indicators and logging setup
//!
//! User-facing status lines go to stdout, spinners and errors to stderr.
//! Diagnostic messages go through `tracing`: to the console at a level chosen
//! by `-v`/`-q`, and to `logs/main.log` in the build root.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

/// Verbosity chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything but errors
    pub quiet: bool,
    /// Number of `-v` flags
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Console log level when `RUST_LOG` is not set
    pub fn console_level(self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }

    /// Level written to the main log file
    pub fn file_level(self) -> LevelFilter {
        if self.verbose >= 2 {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        }
    }

    /// Print a success line unless quiet
    pub fn success(self, message: &str) {
        if !self.quiet {
            println!("{} {message}", status::SUCCESS);
        }
    }

    /// Print a warning line unless quiet
    pub fn warning(self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", status::WARNING);
        }
    }

    /// Spinner for a long-running step; hidden when quiet
    pub fn spinner(self, message: &str) -> ProgressBar {
        if self.quiet {
            ProgressBar::hidden()
        } else {
            create_spinner(message)
        }
    }
}

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the console level. The main log is appended to and
/// never colored.
pub fn init_tracing(config: OutputConfig, main_log: &Path) -> Result<()> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level().into())
        .from_env_lossy();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(main_log)
        .with_context(|| format!("Failed to open log file {}", main_log.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(config.file_level()),
        )
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
