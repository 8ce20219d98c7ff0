use crate::cli::Output;
use crate::git::hook_script;
use crate::hooks::HookName;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct InstallArgs {
    /// Hooks to install (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub hooks: Vec<HookName>,

    /// Overwrite hooks not written by commit-gate
    #[arg(short, long)]
    pub force: bool,
}

impl InstallArgs {
    fn selected(&self) -> Vec<HookName> {
        if self.hooks.is_empty() {
            HookName::ALL.to_vec()
        } else {
            self.hooks.clone()
        }
    }
}

pub async fn execute(args: InstallArgs, output: &Output) -> Result<()> {
    let repo = super::current_repo()?;
    output.header("Installing git hooks");

    let mut installed = 0;
    for hook in args.selected() {
        let name = hook.as_str();
        if repo.hook_exists(name) && !repo.is_managed_hook(name) && !args.force {
            output.warning(&format!(
                "Skipping existing '{name}' hook (use --force to overwrite)"
            ));
            continue;
        }

        repo.install_hook(name, &hook_script(name))?;
        output.success(&format!("Installed '{name}' hook"));
        installed += 1;
    }

    output.info(&format!(
        "{} hooks installed in {}",
        installed,
        repo.hooks_dir().display()
    ));
    Ok(())
}
