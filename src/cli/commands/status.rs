use crate::cli::Output;
use crate::config;
use crate::executors::command::resolve_program;
use crate::hooks::HookName;
use crate::pipeline::CHECK_STEPS;
use anyhow::Result;
use clap::Args;

#[derive(Args, Default)]
pub struct StatusArgs {}

pub async fn execute(_args: StatusArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let repo = super::current_repo()?;
    let workdir = repo.workdir()?;
    output.status_indicator("repository", &workdir.display().to_string(), true);

    let config = match config::load(custom_config, workdir) {
        Ok(config) => {
            output.status_indicator("config", "loaded", true);
            config
        }
        Err(e) => {
            output.status_indicator("config", &format!("{e:#}"), false);
            return Ok(());
        }
    };

    for hook in HookName::ALL {
        let name = hook.as_str();
        output.header(name);

        let installed = if repo.is_managed_hook(name) {
            "installed"
        } else if repo.hook_exists(name) {
            "foreign hook present"
        } else {
            "not installed"
        };
        output.table_row("hook", installed);

        let hook_config = config.hook(hook);
        if !hook_config.enabled {
            output.table_row("checks", "disabled");
            continue;
        }

        for step in CHECK_STEPS {
            if !hook_config.is_enabled(step.kind) {
                output.table_row(step.kind.as_str(), "disabled");
                continue;
            }
            let state = match hook_config.tool_command(step.kind) {
                None => "built in".to_string(),
                Some(command) => match resolve_program(command, workdir) {
                    Ok(path) => path.display().to_string(),
                    Err(e) => e.to_string(),
                },
            };
            output.table_row(step.kind.as_str(), &state);
        }
    }

    Ok(())
}
