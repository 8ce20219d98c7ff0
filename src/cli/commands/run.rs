use crate::cli::Output;
use crate::config;
use crate::git::{PushRange, parse_push_refs};
use crate::hooks::{self, HookContext, HookName};
use crate::pipeline::PipelineVerdict;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{IsTerminal, Read};

#[derive(Args)]
pub struct RunArgs {
    /// Hook to run
    #[arg(value_enum)]
    pub hook: HookName,

    /// Arguments git passes to the hook
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub async fn execute(args: RunArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let repo = super::current_repo()?;
    let config = config::load(custom_config, repo.workdir()?)?;
    tracing::debug!("Running {} hook with arguments {:?}", args.hook, args.args);

    let push_ranges = match args.hook {
        HookName::PrePush => read_push_ranges()?,
        HookName::PreCommit => None,
    };

    let context = HookContext {
        config: config.hook(args.hook),
        repo: &repo,
        reporter: output,
        push_ranges: push_ranges.as_deref(),
    };
    let verdict = hooks::execute(args.hook, context).await?;

    if let PipelineVerdict::Blocked { failed, .. } = &verdict {
        tracing::info!("{} blocked by {}", args.hook, failed);
        std::process::exit(verdict.exit_code());
    }

    Ok(())
}

/// Ref list git writes to pre-push stdin; None when run by hand or given nothing
fn read_push_ranges() -> Result<Option<Vec<PushRange>>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read pushed refs from stdin")?;
    if input.trim().is_empty() {
        return Ok(None);
    }

    let ranges = parse_push_refs(&input);
    tracing::debug!("git announced {} ref updates", ranges.len());
    Ok(Some(ranges))
}
