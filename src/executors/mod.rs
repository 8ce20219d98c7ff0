//! Check executors
//!
//! Each executor wraps one quality tool behind the same contract: given the
//! changed files of its category it returns a passed or failed outcome with
//! the tool's output attached. The pipeline decides what a failure means.
//!
//! - `manifest` - composer.json / composer.lock consistency
//! - `json` - JSON well-formedness, checked in-process
//! - `lint` - `php -l` syntax check
//! - `style_fix` - PHP-CS-Fixer, rewrites files in place
//! - `style_check` - PHP_CodeSniffer
//! - `mess_detection` - PHPMD with a violation threshold
//! - `unit_test` - PHPUnit over the whole suite

pub mod command;
pub mod json;
pub mod lint;
pub mod manifest;
pub mod mess_detection;
pub mod style_check;
pub mod style_fix;

use crate::config::HookConfig;
use crate::pipeline::{CheckKind, StepOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use command::{ToolCommand, ToolOutput};

/// Failures of the collaborator itself, as opposed to a failed check
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The tool is missing from PATH or cannot be executed
    #[error("{tool} is not installed or not executable")]
    Unavailable { tool: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update the git index: {0}")]
    Git(#[from] git2::Error),
}

impl ExecutorError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ExecutorError::Unavailable { .. })
    }
}

/// A quality tool invocation
#[async_trait]
pub trait Executor: Send + Sync {
    /// Name of the underlying tool, used in status output
    fn tool(&self) -> &str;

    /// Run against `files`; project-wide executors receive an empty slice
    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError>;
}

/// Executors bound to the checks they implement
#[derive(Default)]
pub struct ExecutorSet {
    executors: HashMap<CheckKind, Box<dyn Executor>>,
}

impl fmt::Debug for ExecutorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<_> = self
            .executors
            .iter()
            .map(|(kind, executor)| (*kind, executor.tool().to_string()))
            .collect();
        tools.sort();
        f.debug_struct("ExecutorSet").field("executors", &tools).finish()
    }
}

impl ExecutorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: CheckKind, executor: Box<dyn Executor>) {
        self.executors.insert(kind, executor);
    }

    pub fn get(&self, kind: CheckKind) -> Option<&dyn Executor> {
        self.executors.get(&kind).map(|executor| executor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    /// Build the executors enabled in `config`, running tools from `workdir`
    pub fn from_config(config: &HookConfig, workdir: &Path) -> Self {
        let mut set = Self::new();

        if config.composer.enabled {
            set.insert(
                CheckKind::Manifest,
                Box::new(manifest::ManifestExecutor::new(&config.composer, workdir)),
            );
        }
        if config.json_lint.enabled {
            set.insert(CheckKind::JsonSyntax, Box::new(json::JsonExecutor::new(workdir)));
        }
        if config.php_lint.enabled {
            set.insert(
                CheckKind::Lint,
                Box::new(lint::LintExecutor::new(&config.php_lint, workdir)),
            );
        }
        if config.php_cs_fixer.enabled {
            set.insert(
                CheckKind::StyleFix,
                Box::new(style_fix::StyleFixExecutor::new(&config.php_cs_fixer, workdir)),
            );
        }
        if config.phpcs.enabled {
            set.insert(
                CheckKind::StyleCheck,
                Box::new(style_check::StyleCheckExecutor::new(&config.phpcs, workdir)),
            );
        }
        if config.phpmd.enabled {
            set.insert(
                CheckKind::MessDetection,
                Box::new(mess_detection::MessDetectionExecutor::new(&config.phpmd, workdir)),
            );
        }
        if config.phpunit.enabled {
            set.insert(
                CheckKind::UnitTests,
                Box::new(unit_test::UnitTestExecutor::new(&config.phpunit, workdir)),
            );
        }

        tracing::debug!("Built executors: {:?}", set);
        set
    }
}
