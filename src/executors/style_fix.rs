//! Automatic style fixing with PHP-CS-Fixer
//!
//! Rewrites files in place. Which files actually changed is found by comparing
//! contents before and after the run; those files can be added back to the
//! git index so the fixes end up in the commit.

use super::{Executor, ExecutorError, ToolCommand};
use crate::config::PhpCsFixerConfig;
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct StyleFixExecutor {
    command: String,
    rules: String,
    restage: bool,
    workdir: PathBuf,
}

impl StyleFixExecutor {
    pub fn new(config: &PhpCsFixerConfig, workdir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            rules: config.rules.clone(),
            restage: config.restage,
            workdir: workdir.to_path_buf(),
        }
    }

    async fn snapshot(&self, files: &[String]) -> Vec<Option<Vec<u8>>> {
        let mut contents = Vec::with_capacity(files.len());
        for file in files {
            contents.push(tokio::fs::read(self.workdir.join(file)).await.ok());
        }
        contents
    }

    fn restage(&self, files: &[String]) -> Result<(), ExecutorError> {
        let repo = git2::Repository::open(&self.workdir)?;
        let mut index = repo.index()?;
        for file in files {
            index.add_path(Path::new(file))?;
        }
        index.write()?;
        tracing::debug!("Re-staged {} fixed files", files.len());
        Ok(())
    }
}

#[async_trait]
impl Executor for StyleFixExecutor {
    fn tool(&self) -> &str {
        &self.command
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let before = self.snapshot(files).await;

        let output = ToolCommand::new(&self.command, &self.workdir)
            .arg("fix")
            .arg(format!("--rules={}", self.rules))
            .args(["--using-cache=no", "--path-mode=override"])
            .args(files.iter().cloned())
            .output()
            .await?;

        let after = self.snapshot(files).await;
        let changed: Vec<String> = files
            .iter()
            .zip(before.iter().zip(after.iter()))
            .filter(|(_, (old, new))| old != new)
            .map(|(file, _)| file.clone())
            .collect();

        if !changed.is_empty() && self.restage {
            self.restage(&changed)?;
        }

        if !output.success {
            return Ok(StepOutcome::failed(output.combined()));
        }

        if changed.is_empty() {
            Ok(StepOutcome::passed("no files needed fixing"))
        } else {
            Ok(StepOutcome::passed(format!(
                "fixed {} files: {}",
                changed.len(),
                changed.join(", ")
            )))
        }
    }
}
