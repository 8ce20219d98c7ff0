//! Configuration management for commit-gate
//!
//! Settings are resolved once at process start (see [`load`]) and handed to the
//! pipeline as plain structs. Each git hook has its own section, so pre-commit
//! and pre-push can enable different checks.

mod loader;

pub use loader::{DEFAULT_CONFIG, load};

use crate::hooks::HookName;
use crate::pipeline::CheckKind;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub pre_commit: HookConfig,
    pub pre_push: HookConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        let mut pre_push = HookConfig::default();
        // Pushed commits are already recorded; fixing files would only dirty the tree.
        pre_push.php_cs_fixer.restage = false;

        Self {
            pre_commit: HookConfig::default(),
            pre_push,
        }
    }
}

impl GateConfig {
    /// Section for one hook
    pub fn hook(&self, hook: HookName) -> &HookConfig {
        match hook {
            HookName::PreCommit => &self.pre_commit,
            HookName::PrePush => &self.pre_push,
        }
    }
}

/// Settings for one hook invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Run checks at all; a disabled hook always lets git proceed
    pub enabled: bool,

    /// Seconds a single step may take, 0 for no limit
    pub timeout: u64,

    /// Glob patterns removed from the change set before classification
    pub exclude: Vec<String>,

    pub messages: MessagesConfig,
    pub composer: ComposerConfig,
    pub json_lint: JsonLintConfig,
    pub php_lint: PhpLintConfig,
    pub php_cs_fixer: PhpCsFixerConfig,
    pub phpcs: PhpCsConfig,
    pub phpmd: PhpMdConfig,
    pub phpunit: PhpUnitConfig,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: 0,
            exclude: vec!["vendor/**".to_string()],
            messages: MessagesConfig::default(),
            composer: ComposerConfig::default(),
            json_lint: JsonLintConfig::default(),
            php_lint: PhpLintConfig::default(),
            php_cs_fixer: PhpCsFixerConfig::default(),
            phpcs: PhpCsConfig::default(),
            phpmd: PhpMdConfig::default(),
            phpunit: PhpUnitConfig::default(),
        }
    }
}

impl HookConfig {
    /// Whether the check for `kind` is switched on
    pub fn is_enabled(&self, kind: CheckKind) -> bool {
        match kind {
            CheckKind::Manifest => self.composer.enabled,
            CheckKind::JsonSyntax => self.json_lint.enabled,
            CheckKind::Lint => self.php_lint.enabled,
            CheckKind::StyleFix => self.php_cs_fixer.enabled,
            CheckKind::StyleCheck => self.phpcs.enabled,
            CheckKind::MessDetection => self.phpmd.enabled,
            CheckKind::UnitTests => self.phpunit.enabled,
        }
    }

    /// Tool configured for `kind`, if the check shells out to one
    pub fn tool_command(&self, kind: CheckKind) -> Option<&str> {
        match kind {
            CheckKind::Manifest if self.composer.validate => Some(&self.composer.command),
            CheckKind::Manifest | CheckKind::JsonSyntax => None,
            CheckKind::Lint => Some(&self.php_lint.command),
            CheckKind::StyleFix => Some(&self.php_cs_fixer.command),
            CheckKind::StyleCheck => Some(&self.phpcs.command),
            CheckKind::MessDetection => Some(&self.phpmd.command),
            CheckKind::UnitTests => Some(&self.phpunit.command),
        }
    }

    /// Bounded wait per step
    pub fn step_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Compiled exclude patterns
    pub fn exclude_matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
            builder.add(glob);
        }
        builder.build().context("Failed to build exclude patterns")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.exclude_matcher()?;

        if self.php_cs_fixer.enabled && self.php_cs_fixer.rules.trim().is_empty() {
            anyhow::bail!("php_cs_fixer.rules cannot be empty");
        }
        if self.phpcs.enabled && self.phpcs.standard.trim().is_empty() {
            anyhow::bail!("phpcs.standard cannot be empty");
        }
        if self.phpmd.enabled && self.phpmd.ruleset.trim().is_empty() {
            anyhow::bail!("phpmd.ruleset cannot be empty");
        }

        Ok(())
    }
}

/// Messages shown at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Shown when every check passed
    pub right_message: String,

    /// Shown when a check blocked the git action
    pub error_message: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            right_message: "HEY, GOOD JOB!!".to_string(),
            error_message: "FIX YOUR CODE!!".to_string(),
        }
    }
}

/// Dependency manifest check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub enabled: bool,

    /// Also run `composer validate` when the manifest changes
    pub validate: bool,

    pub command: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            validate: false,
            command: "composer".to_string(),
        }
    }
}

/// JSON syntax check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLintConfig {
    pub enabled: bool,
}

impl Default for JsonLintConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// PHP syntax lint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpLintConfig {
    pub enabled: bool,
    pub command: String,
}

impl Default for PhpLintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "php".to_string(),
        }
    }
}

/// Automatic style fixer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpCsFixerConfig {
    pub enabled: bool,
    pub command: String,

    /// Value of `--rules`, e.g. `@PSR2` or `@PSR2,@Symfony`
    pub rules: String,

    /// Add fixed files back to the git index
    pub restage: bool,
}

impl Default for PhpCsFixerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "php-cs-fixer".to_string(),
            rules: "@PSR2".to_string(),
            restage: true,
        }
    }
}

/// Style compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpCsConfig {
    pub enabled: bool,
    pub command: String,
    pub standard: String,
}

impl Default for PhpCsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "phpcs".to_string(),
            standard: "PSR2".to_string(),
        }
    }
}

/// Mess detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpMdConfig {
    pub enabled: bool,
    pub command: String,

    /// Comma-separated rule sets or a path to a ruleset XML
    pub ruleset: String,

    /// Violations tolerated before the step fails
    pub max_violations: usize,
}

impl Default for PhpMdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "phpmd".to_string(),
            ruleset: "codesize,controversial,naming,unusedcode".to_string(),
            max_violations: 0,
        }
    }
}

/// Unit test suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpUnitConfig {
    pub enabled: bool,
    pub command: String,

    /// Run tests in random order
    pub random_mode: bool,

    /// Extra arguments passed through to PHPUnit
    pub options: Vec<String>,
}

impl Default for PhpUnitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "vendor/bin/phpunit".to_string(),
            random_mode: false,
            options: vec![],
        }
    }
}
