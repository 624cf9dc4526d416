//! Core business logic module
//!
//! Per-dependency lifecycle (download, install, clean) and the state it runs
//! against. Process spawning and raw filesystem calls live in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`dependency`] - Dependency file parsing and validation
//! - [`target`] - Target selection (`all`, `dependencies`, single name)
//! - [`settings`] - Settings file handling
//! - [`layout`] - Directory layout derived from root and variant
//! - [`build_env`] - Build environment setup
//! - [`context`] - Resolved per-invocation state
//! - [`fetch`] - Source download logic
//! - [`builder`] - Build and install logic
//! - [`manifest`] - Install manifests over the shared prefix
//! - [`removal`] - Validated removal plans
//! - [`clean`] - Clean logic

pub mod build_env;
pub mod builder;
pub mod clean;
pub mod context;
pub mod dependency;
pub mod fetch;
pub mod layout;
pub mod manifest;
pub mod removal;
pub mod settings;
pub mod target;
