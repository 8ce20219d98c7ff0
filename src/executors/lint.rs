//! PHP syntax lint, one `php -l` per file

use super::{Executor, ExecutorError, ToolCommand};
use crate::config::PhpLintConfig;
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct LintExecutor {
    command: String,
    workdir: PathBuf,
}

impl LintExecutor {
    pub fn new(config: &PhpLintConfig, workdir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            workdir: workdir.to_path_buf(),
        }
    }
}

#[async_trait]
impl Executor for LintExecutor {
    fn tool(&self) -> &str {
        &self.command
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let mut errors = Vec::new();

        for file in files {
            let output = ToolCommand::new(&self.command, &self.workdir)
                .args(["-l", "-d", "display_errors=0"])
                .arg(file)
                .output()
                .await?;
            if !output.success {
                errors.push(output.combined());
            }
        }

        if errors.is_empty() {
            Ok(StepOutcome::passed(format!("{} files without syntax errors", files.len())))
        } else {
            Ok(StepOutcome::failed(errors.join("\n")))
        }
    }
}
