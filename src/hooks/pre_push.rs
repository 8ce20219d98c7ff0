//! Pre-push hook implementation
//!
//! Checks the files touched by the outgoing commits. git lists the refs being
//! pushed on stdin; without that list the range is derived from HEAD.

use super::{HookContext, run_checks};
use crate::pipeline::PipelineVerdict;
use anyhow::Result;

pub async fn execute(context: HookContext<'_>) -> Result<PipelineVerdict> {
    let pushed = context.repo.pushed(context.push_ranges);
    run_checks(&context, &pushed).await
}
