//! Dependency download logic
//!
//! Replaces a dependency's source tree with a fresh clone checked out at the
//! configured branch and, when pinned, commit. The previous tree is always
//! deleted first, so downloading twice leaves the same state as once.

use std::path::PathBuf;

use crate::core::context::Context;
use crate::core::dependency::Dependency;
use crate::error::DepbuildError;
use crate::infra::filesystem;
use crate::infra::git::GitRef;
use crate::infra::process::{find_tool, LogFile};

/// Result of downloading one dependency
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Fresh source tree
    pub source_dir: PathBuf,
    /// Refs checked out, in order
    pub checked_out: Vec<GitRef>,
}

/// Check that the git client can be found
pub fn check_tools(ctx: &Context) -> Result<(), DepbuildError> {
    find_tool(ctx.settings.git(), None, ctx.layout.root())?;
    Ok(())
}

/// Clone `dep` into its source directory
///
/// Any failure leaves the source directory as the failing step left it.
pub async fn download(ctx: &Context, dep: &Dependency) -> Result<DownloadResult, DepbuildError> {
    tracing::info!(
        "Downloading {}: url: {}, branch: {}",
        dep.name,
        dep.url,
        dep.branch
    );

    let source_dir = ctx.layout.source_dir(&dep.name);
    if filesystem::remove_dir_all(&source_dir)? {
        tracing::info!("Removed old {}", source_dir.display());
    }
    filesystem::create_dir_all(&source_dir)?;
    tracing::info!("Created {}", source_dir.display());

    let log = LogFile::create(&ctx.layout.log_file(&dep.name))?;
    let git = ctx.git();

    git.clone_into(&dep.url, &source_dir, &log).await?;

    let mut refs = vec![GitRef::Branch(dep.branch.clone())];
    if let Some(commit) = &dep.commit {
        refs.push(GitRef::Rev(commit.clone()));
    }
    for git_ref in &refs {
        tracing::info!("Checking out {git_ref} in {}", dep.name);
        git.checkout(&source_dir, git_ref, &log).await?;
    }

    tracing::info!("Finished downloading {}", dep.name);
    Ok(DownloadResult {
        source_dir,
        checked_out: refs,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::test_utils::fixtures::{FakeTools, TestRoot};

    #[tokio::test]
    async fn test_download_clones_and_checks_out_branch() {
        let root = TestRoot::new();
        let ctx = root.context(&FakeTools::default());
        let dep = Dependency::new("foo", "https://x/foo.git", "main");

        let result = download(&ctx, &dep).await.unwrap();

        assert_eq!(result.source_dir, ctx.layout.source_dir("foo"));
        assert_eq!(result.checked_out, vec![GitRef::Branch("main".into())]);
        assert!(result.source_dir.join("CMakeLists.txt").is_file());
        assert_eq!(
            std::fs::read_to_string(result.source_dir.join(".checked-out")).unwrap(),
            "main\n"
        );
    }

    #[tokio::test]
    async fn test_download_checks_out_commit_after_branch() {
        let root = TestRoot::new();
        let ctx = root.context(&FakeTools::default());
        let mut dep = Dependency::new("foo", "https://x/foo.git", "devel");
        dep.commit = Some("5c2b7bd".to_string());

        let result = download(&ctx, &dep).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(result.source_dir.join(".checked-out")).unwrap(),
            "devel\n5c2b7bd\n"
        );
    }

    #[tokio::test]
    async fn test_download_twice_purges_previous_tree() {
        let root = TestRoot::new();
        let ctx = root.context(&FakeTools::default());
        let dep = Dependency::new("foo", "https://x/foo.git", "main");

        let first = download(&ctx, &dep).await.unwrap();
        std::fs::write(first.source_dir.join("local-edit.txt"), "edit").unwrap();
        let second = download(&ctx, &dep).await.unwrap();

        assert!(!second.source_dir.join("local-edit.txt").exists());
        assert_eq!(
            std::fs::read_to_string(second.source_dir.join(".checked-out")).unwrap(),
            "main\n"
        );
    }

    #[tokio::test]
    async fn test_failed_clone_stops_before_checkout() {
        let root = TestRoot::new();
        let tools = FakeTools {
            fail_clone: true,
            ..FakeTools::default()
        };
        let ctx = root.context(&tools);
        let dep = Dependency::new("foo", "https://x/foo.git", "main");

        let err = download(&ctx, &dep).await.unwrap_err();

        assert!(matches!(
            err,
            DepbuildError::Command(CommandError::Failed { .. })
        ));
        assert!(err.to_string().contains("foo.log"));
        assert!(!ctx.layout.source_dir("foo").join(".checked-out").exists());
    }
}
