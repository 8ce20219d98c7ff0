//! Composer manifest consistency
//!
//! A changed `composer.json` must travel with its `composer.lock`, otherwise
//! the lock no longer describes the declared dependencies.

use super::{Executor, ExecutorError, ToolCommand};
use crate::config::ComposerConfig;
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use std::path::Path;

const MANIFEST: &str = "composer.json";
const LOCKFILE: &str = "composer.lock";

pub struct ManifestExecutor {
    validate: Option<ToolCommand>,
}

impl ManifestExecutor {
    pub fn new(config: &ComposerConfig, workdir: &Path) -> Self {
        let validate = config.validate.then(|| {
            ToolCommand::new(&config.command, workdir).args([
                "validate",
                "--no-interaction",
                "--no-check-publish",
            ])
        });
        Self { validate }
    }
}

#[async_trait]
impl Executor for ManifestExecutor {
    fn tool(&self) -> &str {
        self.validate
            .as_ref()
            .map_or("composer", |command| command.program())
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let has_manifest = files.iter().any(|file| file == MANIFEST);
        let has_lockfile = files.iter().any(|file| file == LOCKFILE);

        if has_manifest && !has_lockfile {
            return Ok(StepOutcome::failed(format!(
                "{LOCKFILE} must be committed if {MANIFEST} is modified"
            )));
        }

        if let (true, Some(command)) = (has_manifest, &self.validate) {
            let output = command.output().await?;
            if !output.success {
                return Ok(StepOutcome::failed(output.combined()));
            }
        }

        Ok(StepOutcome::passed("composer files are consistent"))
    }
}
