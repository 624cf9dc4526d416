//! Build tool invocation
//!
//! Wraps the external build-file generator and build executor.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CommandError;
use crate::infra::process::{Invocation, LogFile};

/// Generator and executor commands
#[derive(Debug, Clone)]
pub struct BuildTools {
    /// Build-file generator (e.g. cmake)
    pub generator: String,
    /// Arguments selecting the executor backend (e.g. `-GNinja`)
    pub generator_args: Vec<String>,
    /// Arguments passed for every dependency
    pub extra_generator_args: Vec<String>,
    /// Build executor (e.g. ninja)
    pub executor: String,
}

impl BuildTools {
    /// Arguments for configuring `source` to install into `prefix`
    pub fn generate_args(
        &self,
        source: &Path,
        prefix: &Path,
        build_args: &[String],
    ) -> Vec<String> {
        let prefix = prefix.display();
        let mut args = vec![source.display().to_string()];
        args.extend(self.generator_args.iter().cloned());
        args.push(format!("-DCMAKE_INSTALL_PREFIX:PATH={prefix}"));
        args.push(format!("-DCMAKE_PREFIX_PATH:PATH={prefix}"));
        args.push("-DCMAKE_EXPORT_COMPILE_COMMANDS=1".to_string());
        args.extend(self.extra_generator_args.iter().cloned());
        args.extend(build_args.iter().cloned());
        args
    }

    /// Arguments for building and installing with `jobs` parallel jobs
    pub fn install_args(jobs: usize) -> Vec<String> {
        vec!["install".to_string(), format!("-j{jobs}")]
    }

    /// Run the generator in `build_dir`
    pub async fn generate(
        &self,
        source: &Path,
        build_dir: &Path,
        prefix: &Path,
        build_args: &[String],
        env: &BTreeMap<String, String>,
        log: &LogFile,
    ) -> Result<(), CommandError> {
        Invocation {
            program: &self.generator,
            args: self.generate_args(source, prefix, build_args),
            cwd: build_dir,
            env: Some(env),
        }
        .run(log)
        .await
    }

    /// Run the executor's install target in `build_dir`
    pub async fn install(
        &self,
        build_dir: &Path,
        jobs: usize,
        env: &BTreeMap<String, String>,
        log: &LogFile,
    ) -> Result<(), CommandError> {
        Invocation {
            program: &self.executor,
            args: Self::install_args(jobs),
            cwd: build_dir,
            env: Some(env),
        }
        .run(log)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> BuildTools {
        BuildTools {
            generator: "cmake".to_string(),
            generator_args: vec!["-GNinja".to_string()],
            extra_generator_args: vec!["-DBOOST_ROOT=/usr".to_string()],
            executor: "ninja".to_string(),
        }
    }

    #[test]
    fn test_generate_args_order() {
        let args = tools().generate_args(
            Path::new("/work/sources/foo"),
            Path::new("/work/install/gcc-none"),
            &["-DFOO=ON".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "/work/sources/foo",
                "-GNinja",
                "-DCMAKE_INSTALL_PREFIX:PATH=/work/install/gcc-none",
                "-DCMAKE_PREFIX_PATH:PATH=/work/install/gcc-none",
                "-DCMAKE_EXPORT_COMPILE_COMMANDS=1",
                "-DBOOST_ROOT=/usr",
                "-DFOO=ON",
            ]
        );
    }

    #[test]
    fn test_install_args() {
        assert_eq!(BuildTools::install_args(8), vec!["install", "-j8"]);
    }
}
