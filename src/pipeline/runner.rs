//! Sequential check runner

use super::changeset::ChangeSet;
use super::outcome::{PipelineVerdict, SkipReason, StepOutcome, StepReport};
use super::registry::{CheckStep, FileScope, steps_for};
use super::reporter::Reporter;
use crate::config::HookConfig;
use crate::executors::{Executor, ExecutorSet};

/// Drives one hook invocation over a captured change set
///
/// Steps are awaited one at a time. Style fixing rewrites files that the
/// following steps read, so nothing here may run concurrently.
pub struct PipelineRunner<'a> {
    config: &'a HookConfig,
    executors: &'a ExecutorSet,
    reporter: &'a dyn Reporter,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(
        config: &'a HookConfig,
        executors: &'a ExecutorSet,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            executors,
            reporter,
        }
    }

    pub async fn run(&self, change_set: &ChangeSet) -> PipelineVerdict {
        if change_set.is_empty() {
            self.reporter.notice("No files changed");
            return PipelineVerdict::NoChanges;
        }

        let categories = change_set.categories();
        tracing::info!(
            "{} changed files in categories [{}]",
            change_set.len(),
            categories
                .iter()
                .map(|category| category.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut steps = Vec::new();

        for step in steps_for(categories) {
            let executor = match self.executor_for(step) {
                Ok(executor) => executor,
                Err(reason) => {
                    tracing::debug!("Skipping {}: {}", step.kind, reason);
                    self.reporter.step_skipped(step.title, &reason.to_string());
                    steps.push(StepReport {
                        kind: step.kind,
                        outcome: StepOutcome::Skipped(reason),
                    });
                    continue;
                }
            };

            self.reporter.step_starting(step.title);
            let files = match step.scope {
                FileScope::Category => change_set.files_in(step.gate),
                FileScope::Project => Vec::new(),
            };
            let (outcome, blocking) = self.run_step(step, executor, &files).await;

            match &outcome {
                StepOutcome::Passed(detail) => self.reporter.step_succeeded(detail),
                StepOutcome::Failed(detail) if blocking => self.reporter.step_failed(detail),
                StepOutcome::Failed(detail) => self.reporter.step_warned(detail),
                StepOutcome::Skipped(reason) => {
                    self.reporter.step_skipped(step.title, &reason.to_string())
                }
            }

            let failure = match &outcome {
                StepOutcome::Failed(detail) if blocking => Some(detail.clone()),
                _ => None,
            };
            steps.push(StepReport {
                kind: step.kind,
                outcome,
            });

            if let Some(detail) = failure {
                let message = self.config.messages.error_message.clone();
                self.reporter.notice(&message);
                return PipelineVerdict::Blocked {
                    failed: step.kind,
                    detail,
                    steps,
                    message,
                };
            }
        }

        let message = self.config.messages.right_message.clone();
        self.reporter.notice(&message);
        PipelineVerdict::Passed { steps, message }
    }

    fn executor_for(&self, step: &CheckStep) -> Result<&'a dyn Executor, SkipReason> {
        if !self.config.is_enabled(step.kind) {
            return Err(SkipReason::Disabled);
        }
        self.executors.get(step.kind).ok_or(SkipReason::NoExecutor)
    }

    /// Outcome of one executor call and whether a failure blocks
    async fn run_step(
        &self,
        step: &CheckStep,
        executor: &dyn Executor,
        files: &[String],
    ) -> (StepOutcome, bool) {
        tracing::debug!("Running {} with {} on {} files", step.kind, executor.tool(), files.len());

        let result = match self.config.step_timeout() {
            Some(limit) => match tokio::time::timeout(limit, executor.run(files)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("{} timed out after {:?}", step.kind, limit);
                    return (
                        StepOutcome::failed(format!(
                            "{} timed out after {}s",
                            executor.tool(),
                            limit.as_secs()
                        )),
                        true,
                    );
                }
            },
            None => executor.run(files).await,
        };

        match result {
            Ok(outcome) => (outcome, step.blocking),
            Err(e) => {
                tracing::debug!("{} could not run: {}", step.kind, e);
                // A missing tool blocks even where a failed run would not
                let blocking = step.blocking || e.is_unavailable();
                (StepOutcome::failed(e.to_string()), blocking)
            }
        }
    }
}
