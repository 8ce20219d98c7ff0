use crate::cli::Output;
use crate::hooks::HookName;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct UninstallArgs {}

pub async fn execute(_args: UninstallArgs, output: &Output) -> Result<()> {
    let repo = super::current_repo()?;

    let mut removed = 0;
    for hook in HookName::ALL {
        let name = hook.as_str();
        if repo.is_managed_hook(name) {
            repo.remove_hook(name)?;
            output.success(&format!("Removed '{name}' hook"));
            removed += 1;
        } else if repo.hook_exists(name) {
            output.verbose(&format!("Leaving '{name}' hook, it was not installed by commit-gate"));
        }
    }

    if removed == 0 {
        output.info("No commit-gate hooks found to remove");
    }
    Ok(())
}
