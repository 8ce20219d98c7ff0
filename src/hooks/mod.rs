//! Git hook entry points
//!
//! Each hook picks where its changed files come from and then hands off to
//! the shared pipeline:
//!
//! - `pre-commit` checks the files staged in the index
//! - `pre-push` checks the files changed by the commits being pushed
//!
//! ```toml
//! [pre_commit]
//! timeout = 120
//! exclude = ["vendor/**", "tests/fixtures/**"]
//!
//! [pre_push.phpunit]
//! enabled = true
//! random_mode = true
//! ```

mod pre_commit;
mod pre_push;

use crate::config::HookConfig;
use crate::executors::ExecutorSet;
use crate::git::{GitRepo, PushRange};
use crate::pipeline::{ChangeSet, ChangedFilesSource, PipelineRunner, PipelineVerdict, Reporter};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Git hooks commit-gate can run as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookName {
    PreCommit,
    PrePush,
}

impl HookName {
    pub const ALL: [HookName; 2] = [HookName::PreCommit, HookName::PrePush];

    /// File name under `.git/hooks`
    pub fn as_str(self) -> &'static str {
        match self {
            HookName::PreCommit => "pre-commit",
            HookName::PrePush => "pre-push",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a hook needs for one invocation
pub struct HookContext<'a> {
    pub config: &'a HookConfig,
    pub repo: &'a GitRepo,
    pub reporter: &'a dyn Reporter,
    /// Ref updates git announced on pre-push stdin, if any were read
    pub push_ranges: Option<&'a [PushRange]>,
}

/// Run `hook` and return the verdict that decides git's exit status
pub async fn execute(hook: HookName, context: HookContext<'_>) -> Result<PipelineVerdict> {
    if !context.config.enabled {
        tracing::info!("{} hook is disabled", hook);
        context.reporter.notice(&format!("{hook} checks are disabled"));
        return Ok(PipelineVerdict::NoChanges);
    }

    match hook {
        HookName::PreCommit => pre_commit::execute(context).await,
        HookName::PrePush => pre_push::execute(context).await,
    }
}

/// Capture the change set from `source` and run every matching check
async fn run_checks<S>(context: &HookContext<'_>, source: &S) -> Result<PipelineVerdict>
where
    S: ChangedFilesSource + ?Sized,
{
    let exclude = context.config.exclude_matcher()?;
    let change_set = ChangeSet::capture(source, &exclude)?;

    let executors = ExecutorSet::from_config(context.config, context.repo.workdir()?);
    let runner = PipelineRunner::new(context.config, &executors, context.reporter);
    Ok(runner.run(&change_set).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Notices(Mutex<Vec<String>>);

    impl Reporter for Notices {
        fn step_starting(&self, _title: &str) {}
        fn step_succeeded(&self, _detail: &str) {}
        fn step_failed(&self, _detail: &str) {}
        fn notice(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    /// Only the in-process checks, so no PHP tooling is needed
    fn json_only_config() -> HookConfig {
        let mut config = HookConfig::default();
        config.php_lint.enabled = false;
        config.php_cs_fixer.enabled = false;
        config.phpcs.enabled = false;
        config.phpmd.enabled = false;
        config.phpunit.enabled = false;
        config
    }

    fn stage_file(dir: &Path, repo: &Repository, path: &str, content: &str) {
        fs::write(dir.join(path), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(HookName::PreCommit.as_str(), "pre-commit");
        assert_eq!(HookName::PrePush.to_string(), "pre-push");
        assert_eq!(
            HookName::from_str("pre-push", false).unwrap(),
            HookName::PrePush
        );
    }

    #[tokio::test]
    async fn test_pre_commit_blocks_invalid_staged_json() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        stage_file(dir.path(), &repo, "settings.json", "{\"broken\": ");

        let git = GitRepo::open(dir.path()).unwrap();
        let config = json_only_config();
        let reporter = Notices::default();
        let context = HookContext {
            config: &config,
            repo: &git,
            reporter: &reporter,
            push_ranges: None,
        };

        let verdict = execute(HookName::PreCommit, context).await.unwrap();
        assert!(!verdict.allows_git_action());
    }

    #[tokio::test]
    async fn test_pre_commit_ignores_excluded_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        stage_file(dir.path(), &repo, "vendor/broken.json", "{");

        let git = GitRepo::open(dir.path()).unwrap();
        let config = json_only_config();
        let reporter = Notices::default();
        let context = HookContext {
            config: &config,
            repo: &git,
            reporter: &reporter,
            push_ranges: None,
        };

        let verdict = execute(HookName::PreCommit, context).await.unwrap();
        assert_eq!(verdict, PipelineVerdict::NoChanges);
        assert_eq!(*reporter.0.lock().unwrap(), vec!["No files changed"]);
    }

    #[tokio::test]
    async fn test_pre_push_checks_every_announced_commit() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let signature = git2::Signature::now("Test", "test@example.com").unwrap();

        stage_file(dir.path(), &repo, "broken.json", "{");
        let tree = repo.find_tree(repo.index().unwrap().write_tree().unwrap()).unwrap();
        let first = repo
            .commit(Some("HEAD"), &signature, &signature, "first", &tree, &[])
            .unwrap();

        stage_file(dir.path(), &repo, "README.md", "docs");
        let tree = repo.find_tree(repo.index().unwrap().write_tree().unwrap()).unwrap();
        let parent = repo.find_commit(first).unwrap();
        let tip = repo
            .commit(Some("HEAD"), &signature, &signature, "second", &tree, &[&parent])
            .unwrap();

        let git = GitRepo::open(dir.path()).unwrap();
        let config = json_only_config();
        let reporter = Notices::default();
        let ranges = [PushRange {
            local: tip,
            remote: git2::Oid::zero(),
        }];
        let context = HookContext {
            config: &config,
            repo: &git,
            reporter: &reporter,
            push_ranges: Some(&ranges),
        };

        // HEAD alone only touches README.md; the earlier commit carries the broken file
        let verdict = execute(HookName::PrePush, context).await.unwrap();
        assert!(!verdict.allows_git_action());
    }

    #[tokio::test]
    async fn test_disabled_hook_allows_git_action() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        stage_file(dir.path(), &repo, "settings.json", "{");

        let git = GitRepo::open(dir.path()).unwrap();
        let mut config = json_only_config();
        config.enabled = false;
        let reporter = Notices::default();
        let context = HookContext {
            config: &config,
            repo: &git,
            reporter: &reporter,
            push_ranges: None,
        };

        let verdict = execute(HookName::PreCommit, context).await.unwrap();
        assert!(verdict.allows_git_action());
        assert_eq!(
            *reporter.0.lock().unwrap(),
            vec!["pre-commit checks are disabled"]
        );
    }
}
