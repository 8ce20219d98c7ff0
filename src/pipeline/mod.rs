//! Quality-gate pipeline
//!
//! A hook invocation captures its changed files once, classifies them into
//! categories, and runs the matching checks in a fixed order. The first
//! failing blocking check stops the run and blocks the git action.

pub mod changeset;
pub mod classify;
pub mod outcome;
pub mod registry;
pub mod reporter;
pub mod runner;

pub use changeset::{ChangeSet, ChangedFilesSource};
pub use classify::{CategoryFlags, FileCategory, classify, classify_path};
pub use outcome::{PipelineVerdict, SkipReason, StepOutcome, StepReport};
pub use registry::{CHECK_STEPS, CheckKind, CheckStep, FileScope, steps_for};
pub use reporter::Reporter;
pub use runner::PipelineRunner;
