//! JSON well-formedness, checked without an external tool

use super::{Executor, ExecutorError};
use crate::pipeline::StepOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct JsonExecutor {
    workdir: PathBuf,
}

impl JsonExecutor {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }
}

/// Parse error for one document, or `None` if it is valid JSON
pub fn syntax_error(content: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(content)
        .err()
        .map(|e| e.to_string())
}

#[async_trait]
impl Executor for JsonExecutor {
    fn tool(&self) -> &str {
        "serde_json"
    }

    async fn run(&self, files: &[String]) -> Result<StepOutcome, ExecutorError> {
        let mut errors = Vec::new();

        for file in files {
            let path = self.workdir.join(file);
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    if let Some(error) = syntax_error(&content) {
                        tracing::debug!("Invalid JSON in {}: {}", file, error);
                        errors.push(format!("{file}: {error}"));
                    }
                }
                Err(source) => return Err(ExecutorError::Read { path: path.clone(), source }),
            }
        }

        if errors.is_empty() {
            Ok(StepOutcome::passed(format!("{} json files valid", files.len())))
        } else {
            Ok(StepOutcome::failed(errors.join("\n")))
        }
    }
}
