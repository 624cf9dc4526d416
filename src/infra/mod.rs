//! Infrastructure layer
//!
//! Handles I/O: filesystem, external processes and platform directories.

pub mod dirs;
pub mod filesystem;
pub mod git;
pub mod process;
pub mod toolchain;
