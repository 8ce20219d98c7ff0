//! Git integration layer for commit-gate
//!
//! Repository discovery, changed-file capture and hook script management, all
//! through git2.

mod operations;

pub use operations::{PushRange, PushedFiles, StagedFiles, parse_push_refs};

use anyhow::{Context, Result};
use git2::Repository;
use std::fs;
use std::path::{Path, PathBuf};

/// First line after the shebang of every hook script we write
pub const HOOK_MARKER: &str = "# Installed by commit-gate";

pub struct GitRepo {
    pub repo: Repository,
}

impl GitRepo {
    /// Find the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("No Git repository found")?;
        Ok(Self { repo })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open Git repository")?;
        Ok(Self { repo })
    }

    /// Root of the working tree; tools run from here
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.repo.path().join("hooks")
    }

    pub fn hook_path(&self, hook_name: &str) -> PathBuf {
        self.hooks_dir().join(hook_name)
    }

    /// Install a git hook
    pub fn install_hook(&self, hook_name: &str, hook_content: &str) -> Result<()> {
        let hooks_dir = self.hooks_dir();
        let hook_path = hooks_dir.join(hook_name);

        fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;
        fs::write(&hook_path, hook_content).context("Failed to write hook file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        tracing::debug!("Wrote {}", hook_path.display());
        Ok(())
    }

    /// Remove a git hook
    pub fn remove_hook(&self, hook_name: &str) -> Result<()> {
        let hook_path = self.hook_path(hook_name);

        if hook_path.exists() {
            fs::remove_file(&hook_path).context("Failed to remove hook file")?;
        }

        Ok(())
    }

    pub fn hook_exists(&self, hook_name: &str) -> bool {
        self.hook_path(hook_name).exists()
    }

    /// Whether the hook exists and was written by commit-gate
    pub fn is_managed_hook(&self, hook_name: &str) -> bool {
        fs::read_to_string(self.hook_path(hook_name))
            .map(|content| content.contains(HOOK_MARKER))
            .unwrap_or(false)
    }
}

/// Shell script that hands a git hook over to `commit-gate run`
pub fn hook_script(hook_name: &str) -> String {
    format!("#!/bin/sh\n{HOOK_MARKER}\nexec commit-gate run {hook_name} \"$@\"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_remove_hook() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        assert!(!repo.is_managed_hook("pre-commit"));
        repo.install_hook("pre-commit", &hook_script("pre-commit")).unwrap();
        assert!(repo.hook_exists("pre-commit"));
        assert!(repo.is_managed_hook("pre-commit"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(repo.hook_path("pre-commit")).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }

        repo.remove_hook("pre-commit").unwrap();
        assert!(!repo.hook_exists("pre-commit"));
        // Removing twice is fine
        repo.remove_hook("pre-commit").unwrap();
    }

    #[test]
    fn test_foreign_hook_is_not_managed() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::open(dir.path()).unwrap();

        repo.install_hook("pre-push", "#!/bin/sh\nmake test\n").unwrap();
        assert!(repo.hook_exists("pre-push"));
        assert!(!repo.is_managed_hook("pre-push"));
    }

    #[test]
    fn test_hook_script_runs_named_hook() {
        let script = hook_script("pre-push");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains("exec commit-gate run pre-push \"$@\""));
    }

    #[test]
    fn test_discover_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GitRepo::discover(dir.path().join("missing")).is_err());
    }
}
