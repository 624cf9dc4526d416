//! Invocation context
//!
//! Everything an operation needs, resolved once at startup: directory layout,
//! settings, the composed environment and the job count.

use std::collections::BTreeMap;

use crate::core::build_env::BuildEnvironment;
use crate::core::layout::Layout;
use crate::core::settings::Settings;
use crate::infra::git::GitClient;
use crate::infra::toolchain::BuildTools;

/// Resolved state shared by every per-dependency operation
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory layout
    pub layout: Layout,
    /// Settings
    pub settings: Settings,
    /// Environment variables for generator and executor
    pub env: BTreeMap<String, String>,
    /// Parallel jobs for the executor
    pub jobs: usize,
}

impl Context {
    /// Create a context, composing the environment from `base_env`
    pub fn new(
        layout: Layout,
        settings: Settings,
        build_env: BuildEnvironment,
        base_env: &BTreeMap<String, String>,
        jobs: usize,
    ) -> Self {
        let env = build_env.apply(base_env);
        Self {
            layout,
            settings,
            env,
            jobs,
        }
    }

    /// Create a context on top of the current process environment
    pub fn from_process_env(
        layout: Layout,
        settings: Settings,
        build_env: BuildEnvironment,
        jobs: usize,
    ) -> Self {
        let env = build_env.apply_to_process();
        Self {
            layout,
            settings,
            env,
            jobs,
        }
    }

    /// Git client from settings
    pub fn git(&self) -> GitClient {
        GitClient::new(self.settings.git())
    }

    /// Generator and executor from settings
    pub fn tools(&self) -> BuildTools {
        BuildTools {
            generator: self.settings.generator().to_string(),
            generator_args: self.settings.generator_args(),
            extra_generator_args: self.settings.tools.extra_generator_args.clone(),
            executor: self.settings.executor().to_string(),
        }
    }
}
