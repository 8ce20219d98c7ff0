//! Pre-commit hook implementation
//!
//! Checks the files staged in the index. Style fixes can be re-staged so the
//! fixed content is what gets committed.

use super::{HookContext, run_checks};
use crate::pipeline::PipelineVerdict;
use anyhow::Result;

pub async fn execute(context: HookContext<'_>) -> Result<PipelineVerdict> {
    let staged = context.repo.staged();
    run_checks(&context, &staged).await
}
