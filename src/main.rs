//! depbuild CLI - personal dependency build orchestrator
//!
//! Entry point for the depbuild command-line application.

use clap::Parser;

use depbuild::cli::output::display_error;
use depbuild::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Run the command and handle errors
    if let Err(e) = cli.run().await {
        tracing::error!("{e:#}");
        display_error(&e);
        std::process::exit(1);
    }
}
