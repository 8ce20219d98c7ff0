//! External tool invocation
//!
//! Resolves the program on PATH (or relative to the repository for paths such
//! as `vendor/bin/phpunit`) and captures its output. Children are killed if the
//! caller stops waiting, so a timed-out step does not leave a tool running.

use super::ExecutorError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => String::new(),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Builder for one tool run
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    workdir: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, workdir: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: workdir.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the executable without running it
    pub fn resolve(&self) -> Result<PathBuf, ExecutorError> {
        resolve_program(&self.program, &self.workdir)
    }

    /// Run to completion and capture output
    pub async fn output(&self) -> Result<ToolOutput, ExecutorError> {
        let executable = self.resolve()?;
        tracing::debug!("Running {} {}", executable.display(), self.args.join(" "));

        let output = Command::new(&executable)
            .args(&self.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecutorError::Spawn {
                tool: self.program.clone(),
                source,
            })?;

        let result = ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::trace!("{} exited with {:?}", self.program, result.code);
        Ok(result)
    }
}

/// Find `program` on PATH, or relative to `workdir` when it contains a separator
pub fn resolve_program(program: &str, workdir: &Path) -> Result<PathBuf, ExecutorError> {
    which::which_in(program, std::env::var_os("PATH"), workdir).map_err(|e| {
        tracing::debug!("Could not resolve {}: {}", program, e);
        ExecutorError::Unavailable {
            tool: program.to_string(),
        }
    })
}
