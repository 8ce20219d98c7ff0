//! Mess detection with PHPMD
//!
//! PHPMD exits 0 when clean and 2 when it found violations; any other status
//! is a tool error. Violations in the text report are counted and compared to
//! the configured threshold.

use super::{Executor, ExecutorError, ToolCommand};
use crate::config::PhpMdConfig;
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const VIOLATIONS_FOUND: i32 = 2;

static VIOLATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S.*:\d+\s")
        .unwrap_or_else(|e| panic!("invalid violation pattern: {e}"))
});

/// Number of violation lines in a PHPMD text report
pub fn count_violations(report: &str) -> usize {
    report
        .lines()
        .filter(|line| VIOLATION_LINE.is_match(line))
        .count()
}

pub struct MessDetectionExecutor {
    command: String,
    ruleset: String,
    max_violations: usize,
    workdir: PathBuf,
}

impl MessDetectionExecutor {
    pub fn new(config: &PhpMdConfig, workdir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            ruleset: config.ruleset.clone(),
            max_violations: config.max_violations,
            workdir: workdir.to_path_buf(),
        }
    }
}

#[async_trait]
impl Executor for MessDetectionExecutor {
    fn tool(&self) -> &str {
        &self.command
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let output = ToolCommand::new(&self.command, &self.workdir)
            .arg(files.join(","))
            .arg("text")
            .arg(&self.ruleset)
            .output()
            .await?;

        if !output.success && output.code != Some(VIOLATIONS_FOUND) {
            return Ok(StepOutcome::failed(output.combined()));
        }

        let violations = count_violations(&output.stdout);
        tracing::debug!(
            "{} reported {} violations (limit {})",
            self.command,
            violations,
            self.max_violations
        );

        // The exit status is authoritative when the report format is unfamiliar
        if violations == 0 && output.code == Some(VIOLATIONS_FOUND) {
            return Ok(StepOutcome::failed(format!(
                "{} reported violations that could not be counted\n{}",
                self.command,
                output.combined()
            )));
        }

        if violations > self.max_violations {
            Ok(StepOutcome::failed(format!(
                "{} violations exceed the limit of {}\n{}",
                violations,
                self.max_violations,
                output.combined()
            )))
        } else {
            Ok(StepOutcome::passed(format!(
                "{} violations (limit {})",
                violations, self.max_violations
            )))
        }
    }
}
