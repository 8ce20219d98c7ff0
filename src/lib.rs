//! # commit-gate - quality gate for PHP projects
//!
//! Runs from git's `pre-commit` and `pre-push` hooks. The files touched by the
//! git action are classified, and only the checks relevant to those files run,
//! in a fixed order:
//!
//! 1. composer manifest consistency
//! 2. JSON syntax
//! 3. PHP syntax (`php -l`)
//! 4. style fixing (PHP-CS-Fixer, never blocks on its own)
//! 5. style checking (PHP_CodeSniffer)
//! 6. mess detection (PHPMD)
//! 7. unit tests (PHPUnit)
//!
//! The first failing blocking check stops the run and makes the hook exit
//! non-zero, which aborts the commit or push.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the hooks in your repository
//! commit-gate install
//!
//! # Run the pre-commit checks by hand
//! commit-gate run pre-commit
//! ```

pub mod cli;
pub mod config;
pub mod executors;
pub mod git;
pub mod hooks;
pub mod pipeline;

pub use cli::{Cli, Output};
pub use config::{GateConfig, HookConfig};
pub use pipeline::{ChangeSet, PipelineRunner, PipelineVerdict};

/// Result type alias for commit-gate operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
