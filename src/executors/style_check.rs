//! Style compliance with PHP_CodeSniffer

use super::{Executor, ExecutorError, ToolCommand};
use crate::config::PhpCsConfig;
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct StyleCheckExecutor {
    command: String,
    standard: String,
    workdir: PathBuf,
}

impl StyleCheckExecutor {
    pub fn new(config: &PhpCsConfig, workdir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            standard: config.standard.clone(),
            workdir: workdir.to_path_buf(),
        }
    }
}

#[async_trait]
impl Executor for StyleCheckExecutor {
    fn tool(&self) -> &str {
        &self.command
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let output = ToolCommand::new(&self.command, &self.workdir)
            .arg(format!("--standard={}", self.standard))
            .args(["--report=full", "-n"])
            .args(files.iter().cloned())
            .output()
            .await?;

        if output.success {
            Ok(StepOutcome::passed(format!(
                "{} files follow {}",
                files.len(),
                self.standard
            )))
        } else {
            Ok(StepOutcome::failed(output.combined()))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn fake_phpcs(dir: &Path, body: &str) -> PhpCsConfig {
        let script = dir.join("fake-phpcs");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        PhpCsConfig {
            enabled: true,
            command: script.to_string_lossy().into_owned(),
            standard: "PSR12".to_string(),
        }
    }

    #[tokio::test]
    async fn test_passes_standard_and_files() {
        let dir = tempfile::tempdir().unwrap();
        // Fails unless called with the expected arguments
        let config = fake_phpcs(
            dir.path(),
            "[ \"$1\" = \"--standard=PSR12\" ] && [ \"$4\" = \"src/A.php\" ]",
        );
        let executor = StyleCheckExecutor::new(&config, dir.path());
        let outcome = executor.run(&["src/A.php".to_string()]).await.unwrap();
        assert_eq!(outcome, StepOutcome::passed("1 files follow PSR12"));
    }

    #[tokio::test]
    async fn test_violations_fail_with_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = fake_phpcs(
            dir.path(),
            "echo 'FILE: src/A.php'\necho ' 3 | ERROR | Missing namespace'\nexit 2",
        );
        let executor = StyleCheckExecutor::new(&config, dir.path());
        let outcome = executor.run(&["src/A.php".to_string()]).await.unwrap();
        assert_eq!(
            outcome,
            StepOutcome::failed("FILE: src/A.php\n 3 | ERROR | Missing namespace")
        );
    }
}
