//! Command implementations for the commit-gate CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod install;
pub mod run;
pub mod status;
pub mod uninstall;

use crate::git::GitRepo;
use anyhow::{Context, Result};

/// Repository containing the current directory
pub(crate) fn current_repo() -> Result<GitRepo> {
    GitRepo::discover(".").context("commit-gate must be run inside a git repository")
}
