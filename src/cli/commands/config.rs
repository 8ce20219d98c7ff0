use crate::config::{self, GateConfig};
use crate::hooks::HookName;
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display the merged configuration
    Show {
        /// Only show the section for one hook
        #[arg(long, value_enum)]
        hook: Option<HookName>,

        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommand::Show { hook, format } => {
            let workdir = match super::current_repo() {
                Ok(repo) => repo.workdir()?.to_path_buf(),
                Err(_) => std::env::current_dir()?,
            };
            let config = config::load(custom_config, &workdir)?;
            println!("{}", render(&config, hook, format)?);
        }
    }
    Ok(())
}

fn render(config: &GateConfig, hook: Option<HookName>, format: ConfigFormat) -> Result<String> {
    match hook {
        Some(hook) => serialize(config.hook(hook), format),
        None => serialize(config, format),
    }
}

fn serialize<T: Serialize>(value: &T, format: ConfigFormat) -> Result<String> {
    let text = match format {
        ConfigFormat::Toml => toml::to_string_pretty(value).context("Failed to render TOML")?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to render JSON")?
        }
        ConfigFormat::Yaml => serde_yml::to_string(value).context("Failed to render YAML")?,
    };
    Ok(text)
}
