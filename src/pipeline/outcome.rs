//! Step outcomes and the aggregate verdict

use super::registry::CheckKind;
use std::fmt;

/// Why a step did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Turned off in the hook configuration
    Disabled,
    /// No executor registered for the check
    NoExecutor,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Disabled => "disabled",
            SkipReason::NoExecutor => "no executor",
        };
        f.write_str(reason)
    }
}

/// Result of one step; terminal as soon as it is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Skipped(SkipReason),
    Passed(String),
    /// Carries the collaborator output verbatim
    Failed(String),
}

impl StepOutcome {
    pub fn passed(detail: impl Into<String>) -> Self {
        StepOutcome::Passed(detail.into())
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        StepOutcome::Failed(detail.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Outcome of a step that was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: CheckKind,
    pub outcome: StepOutcome,
}

/// Final decision for one hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineVerdict {
    /// Nothing changed; the git action proceeds without running any check
    NoChanges,
    /// Every blocking step passed or was skipped
    Passed {
        steps: Vec<StepReport>,
        message: String,
    },
    /// A blocking step failed; later steps never ran
    Blocked {
        failed: CheckKind,
        detail: String,
        steps: Vec<StepReport>,
        message: String,
    },
}

impl PipelineVerdict {
    /// Whether the git operation may continue
    pub fn allows_git_action(&self) -> bool {
        !matches!(self, PipelineVerdict::Blocked { .. })
    }

    pub fn exit_code(&self) -> i32 {
        if self.allows_git_action() { 0 } else { 1 }
    }

    /// Steps that were reached, in execution order
    pub fn steps(&self) -> &[StepReport] {
        match self {
            PipelineVerdict::NoChanges => &[],
            PipelineVerdict::Passed { steps, .. } | PipelineVerdict::Blocked { steps, .. } => steps,
        }
    }

    /// Non-blocking failures tolerated on the way to the verdict
    pub fn warnings(&self) -> impl Iterator<Item = &StepReport> {
        let failed = match self {
            PipelineVerdict::Blocked { failed, .. } => Some(*failed),
            _ => None,
        };
        self.steps()
            .iter()
            .filter(move |report| report.outcome.is_failed() && Some(report.kind) != failed)
    }
}
