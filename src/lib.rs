//! depbuild - personal dependency build orchestrator
//!
//! Clones source repositories, builds and installs them with CMake and Ninja
//! into a shared prefix per build variant, and removes exactly what each
//! dependency installed again.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Dependency lifecycle logic
//! - [`infra`] - Infrastructure layer (filesystem, processes)
//! - [`config`] - Constants and defaults
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
