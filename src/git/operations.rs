use super::GitRepo;
use crate::pipeline::ChangedFilesSource;
use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffOptions, Oid, Status, StatusOptions, Tree};
use std::collections::BTreeSet;
use std::path::Path;

/// One ref update from the list git writes to the pre-push hook's stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushRange {
    pub local: Oid,
    /// Zero when the remote ref does not exist yet
    pub remote: Oid,
}

/// Parse `<local ref> <local sha> <remote ref> <remote sha>` lines
///
/// Ref deletions have a zero local sha and are dropped, as are malformed lines.
pub fn parse_push_refs(input: &str) -> Vec<PushRange> {
    input
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [_, local, _, remote] = fields.as_slice() else {
                if !line.trim().is_empty() {
                    tracing::debug!("Ignoring malformed push ref line: {}", line);
                }
                return None;
            };
            let local = Oid::from_str(local).ok()?;
            let remote = Oid::from_str(remote).ok()?;
            (!local.is_zero()).then_some(PushRange { local, remote })
        })
        .collect()
}

impl GitRepo {
    /// Files staged for commit, relative to the repository root
    ///
    /// Renames report the new path. Deletions are left out since there is no
    /// content left to check.
    pub fn get_staged_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut status_opts = StatusOptions::new();
        status_opts.include_ignored(false);
        status_opts.include_untracked(false);
        status_opts.renames_head_to_index(true);

        let statuses = self
            .repo
            .statuses(Some(&mut status_opts))
            .context("Failed to get repository status")?;

        for entry in statuses.iter() {
            let status = entry.status();
            if !status.intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            ) {
                continue;
            }

            let path = entry
                .head_to_index()
                .and_then(|delta| delta.new_file().path().map(|p| p.to_string_lossy().into_owned()))
                .or_else(|| entry.path().map(str::to_string));
            if let Some(path) = path {
                files.push(path);
            }
        }

        tracing::debug!("{} staged files", files.len());
        Ok(files)
    }

    /// Files changed by the commits about to be pushed
    ///
    /// Compares HEAD with its merge base against the upstream branch. Without
    /// an upstream, HEAD's first parent is used, and a root commit yields its
    /// whole tree.
    pub fn get_pushed_files(&self) -> Result<Vec<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                tracing::debug!("HEAD is unborn, nothing to push");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context("Failed to get HEAD reference"),
        };
        let head_commit = head.peel_to_commit().context("HEAD does not point to a commit")?;
        let head_tree = head_commit.tree()?;

        let base_tree = match self.upstream_base(&head)? {
            Some(tree) => Some(tree),
            None if head_commit.parent_count() > 0 => Some(head_commit.parent(0)?.tree()?),
            None => None,
        };

        let mut diff_opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), Some(&mut diff_opts))
            .context("Failed to diff pushed commits")?;

        let files = changed_paths(&diff);
        tracing::debug!("{} files in pushed commits", files.len());
        Ok(files)
    }

    /// Files changed by the commits in `ranges` that the remote does not have
    ///
    /// Every outgoing commit is diffed against its first parent. A new remote
    /// ref, or a remote sha unknown locally, hides whatever is already on a
    /// remote-tracking branch. Paths deleted by a later commit are dropped.
    pub fn get_pushed_files_for(&self, ranges: &[PushRange]) -> Result<Vec<String>> {
        let mut files = BTreeSet::new();

        for range in ranges {
            let local = self
                .repo
                .find_object(range.local, None)
                .and_then(|object| object.peel_to_commit())
                .with_context(|| format!("Pushed object {} is not a commit", range.local))?;
            let local_tree = local.tree()?;

            let mut walk = self.repo.revwalk().context("Failed to walk pushed commits")?;
            walk.push(local.id())?;
            let known_remote = if range.remote.is_zero() {
                None
            } else {
                self.repo
                    .find_object(range.remote, None)
                    .and_then(|object| object.peel_to_commit())
                    .ok()
            };
            match known_remote {
                Some(remote) => walk.hide(remote.id())?,
                None => walk.hide_glob("refs/remotes")?,
            }

            for oid in walk {
                let commit = self.repo.find_commit(oid?)?;
                let parent_tree = match commit.parent_count() {
                    0 => None,
                    _ => Some(commit.parent(0)?.tree()?),
                };
                let diff = self
                    .repo
                    .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit.tree()?), None)
                    .context("Failed to diff pushed commit")?;
                for path in changed_paths(&diff) {
                    if local_tree.get_path(Path::new(&path)).is_ok() {
                        files.insert(path);
                    }
                }
            }
        }

        tracing::debug!("{} files in {} pushed refs", files.len(), ranges.len());
        Ok(files.into_iter().collect())
    }

    /// Tree of the merge base between HEAD and its upstream, if one is configured
    fn upstream_base(&self, head: &git2::Reference<'_>) -> Result<Option<Tree<'_>>> {
        if !head.is_branch() {
            return Ok(None);
        }
        let Some(name) = head.shorthand() else {
            return Ok(None);
        };
        let branch = self.repo.find_branch(name, git2::BranchType::Local)?;
        let Ok(upstream) = branch.upstream() else {
            tracing::debug!("Branch {} has no upstream", name);
            return Ok(None);
        };

        let (Some(head_oid), Some(upstream_oid)) = (head.target(), upstream.get().target()) else {
            return Ok(None);
        };
        let base = self
            .repo
            .merge_base(head_oid, upstream_oid)
            .context("Failed to find merge base with upstream")?;
        Ok(Some(self.repo.find_commit(base)?.tree()?))
    }

    pub fn staged(&self) -> StagedFiles<'_> {
        StagedFiles { repo: self }
    }

    /// Pushed files from git's ref list when given, from HEAD otherwise
    pub fn pushed<'a>(&'a self, ranges: Option<&'a [PushRange]>) -> PushedFiles<'a> {
        PushedFiles { repo: self, ranges }
    }
}

fn changed_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter(|delta| delta.status() != Delta::Deleted)
        .filter_map(|delta| delta.new_file().path())
        .map(|path| path.to_string_lossy().into_owned())
        .collect()
}

/// Change source for pre-commit
pub struct StagedFiles<'a> {
    repo: &'a GitRepo,
}

impl ChangedFilesSource for StagedFiles<'_> {
    fn changed_files(&self) -> Result<Vec<String>> {
        self.repo.get_staged_files()
    }
}

/// Change source for pre-push
pub struct PushedFiles<'a> {
    repo: &'a GitRepo,
    ranges: Option<&'a [PushRange]>,
}

impl ChangedFilesSource for PushedFiles<'_> {
    fn changed_files(&self) -> Result<Vec<String>> {
        match self.ranges {
            Some(ranges) => self.repo.get_pushed_files_for(ranges),
            None => self.repo.get_pushed_files(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::fs;

    fn write(dir: &Path, path: &str, content: &str) {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    fn stage(repo: &Repository, paths: &[&str]) {
        let mut index = repo.index().unwrap();
        for path in paths {
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();
    }

    fn commit(repo: &Repository, message: &str) -> Oid {
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let mut index = repo.index().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parents: Vec<_> = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_staged_files_skip_unstaged_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "old.php", "<?php");
        write(dir.path(), "kept.php", "<?php");
        stage(&repo, &["old.php", "kept.php"]);
        commit(&repo, "initial");

        write(dir.path(), "src/New.php", "<?php");
        write(dir.path(), "kept.php", "<?php echo 1;");
        write(dir.path(), "untracked.json", "{}");
        stage(&repo, &["src/New.php", "kept.php"]);
        {
            let mut index = repo.index().unwrap();
            index.remove_path(Path::new("old.php")).unwrap();
            index.write().unwrap();
        }

        let git = GitRepo::open(dir.path()).unwrap();
        let mut staged = git.get_staged_files().unwrap();
        staged.sort();
        assert_eq!(staged, vec!["kept.php", "src/New.php"]);
    }

    #[test]
    fn test_staged_files_before_first_commit() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "composer.json", "{}");
        stage(&repo, &["composer.json"]);

        let git = GitRepo::open(dir.path()).unwrap();
        assert_eq!(git.staged().changed_files().unwrap(), vec!["composer.json"]);
    }

    #[test]
    fn test_pushed_files_from_first_parent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "a.php", "<?php");
        stage(&repo, &["a.php"]);
        commit(&repo, "initial");

        write(dir.path(), "b.json", "{}");
        stage(&repo, &["b.json"]);
        commit(&repo, "second");

        let git = GitRepo::open(dir.path()).unwrap();
        assert_eq!(git.get_pushed_files().unwrap(), vec!["b.json"]);
    }

    #[test]
    fn test_pushed_files_root_commit_is_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "a.php", "<?php");
        write(dir.path(), "lib/b.php", "<?php");
        stage(&repo, &["a.php", "lib/b.php"]);
        commit(&repo, "initial");

        let git = GitRepo::open(dir.path()).unwrap();
        let mut pushed = git.pushed(None).changed_files().unwrap();
        pushed.sort();
        assert_eq!(pushed, vec!["a.php", "lib/b.php"]);
    }

    #[test]
    fn test_pushed_files_against_upstream() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "a.php", "<?php");
        stage(&repo, &["a.php"]);
        let base = commit(&repo, "initial");

        // Fake a remote-tracking branch at the first commit
        repo.reference("refs/remotes/origin/main", base, true, "test").unwrap();
        let branch_name = repo.head().unwrap().shorthand().unwrap().to_string();
        let mut config = repo.config().unwrap();
        config
            .set_str(&format!("branch.{branch_name}.remote"), "origin")
            .unwrap();
        config
            .set_str(&format!("branch.{branch_name}.merge"), "refs/heads/main")
            .unwrap();
        config.set_str("remote.origin.url", "https://example.com/repo.git").unwrap();
        config
            .set_str("remote.origin.fetch", "+refs/heads/*:refs/remotes/origin/*")
            .unwrap();

        write(dir.path(), "b.php", "<?php");
        stage(&repo, &["b.php"]);
        commit(&repo, "second");
        write(dir.path(), "c.json", "{}");
        stage(&repo, &["c.json"]);
        commit(&repo, "third");

        let git = GitRepo::open(dir.path()).unwrap();
        let mut pushed = git.get_pushed_files().unwrap();
        pushed.sort();
        assert_eq!(pushed, vec!["b.php", "c.json"]);
    }

    #[test]
    fn test_parse_push_refs() {
        let local = "1111111111111111111111111111111111111111";
        let remote = "2222222222222222222222222222222222222222";
        let zero = "0000000000000000000000000000000000000000";
        let input = format!(
            "refs/heads/main {local} refs/heads/main {remote}\n\
             refs/heads/topic {local} refs/heads/topic {zero}\n\
             (delete) {zero} refs/heads/old {remote}\n\
             garbage\n\n"
        );

        let ranges = parse_push_refs(&input);
        assert_eq!(
            ranges,
            vec![
                PushRange {
                    local: Oid::from_str(local).unwrap(),
                    remote: Oid::from_str(remote).unwrap(),
                },
                PushRange {
                    local: Oid::from_str(local).unwrap(),
                    remote: Oid::zero(),
                },
            ]
        );
        assert!(parse_push_refs("").is_empty());
    }

    #[test]
    fn test_pushed_new_branch_covers_every_unpushed_commit() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "base.php", "<?php");
        stage(&repo, &["base.php"]);
        let base = commit(&repo, "initial");
        repo.reference("refs/remotes/origin/main", base, true, "test").unwrap();

        write(dir.path(), "broken.json", "{");
        stage(&repo, &["broken.json"]);
        commit(&repo, "first unpushed");
        write(dir.path(), "src/App.php", "<?php");
        stage(&repo, &["src/App.php"]);
        let tip = commit(&repo, "second unpushed");

        let git = GitRepo::open(dir.path()).unwrap();
        let ranges = [PushRange {
            local: tip,
            remote: Oid::zero(),
        }];
        assert_eq!(
            git.pushed(Some(&ranges)).changed_files().unwrap(),
            vec!["broken.json", "src/App.php"]
        );
    }

    #[test]
    fn test_pushed_range_stops_at_remote_sha() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "a.php", "<?php");
        stage(&repo, &["a.php"]);
        commit(&repo, "initial");
        write(dir.path(), "b.php", "<?php");
        stage(&repo, &["b.php"]);
        let remote = commit(&repo, "already pushed");

        write(dir.path(), "c.json", "{}");
        stage(&repo, &["c.json"]);
        commit(&repo, "outgoing");
        write(dir.path(), "d.php", "<?php");
        stage(&repo, &["d.php"]);
        let tip = commit(&repo, "outgoing too");

        let git = GitRepo::open(dir.path()).unwrap();
        let ranges = [PushRange { local: tip, remote }];
        assert_eq!(
            git.get_pushed_files_for(&ranges).unwrap(),
            vec!["c.json", "d.php"]
        );
    }

    #[test]
    fn test_pushed_range_drops_files_deleted_later() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(dir.path(), "a.php", "<?php");
        stage(&repo, &["a.php"]);
        let remote = commit(&repo, "initial");

        write(dir.path(), "tmp.json", "{");
        stage(&repo, &["tmp.json"]);
        commit(&repo, "add scratch file");
        {
            let mut index = repo.index().unwrap();
            index.remove_path(Path::new("tmp.json")).unwrap();
            index.write().unwrap();
        }
        let tip = commit(&repo, "remove scratch file");

        let git = GitRepo::open(dir.path()).unwrap();
        let ranges = [PushRange { local: tip, remote }];
        assert!(git.get_pushed_files_for(&ranges).unwrap().is_empty());
    }

    #[test]
    fn test_pushed_files_unborn_head_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let git = GitRepo::open(dir.path()).unwrap();
        assert!(git.get_pushed_files().unwrap().is_empty());
    }
}
