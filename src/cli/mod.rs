//! Command-line interface for commit-gate
//!
//! clap parses the arguments; each subcommand lives in its own module under
//! `commands`.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod output;

pub use output::Output;

use commands::{config, install, run, status, uninstall};

/// Quality gate for PHP projects, run from git hooks
#[derive(Parser)]
#[command(name = "commit-gate", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the checks for a git hook
    Run(run::RunArgs),
    /// Install git hooks into the current repository
    Install(install::InstallArgs),
    /// Remove hooks installed by commit-gate
    Uninstall(uninstall::UninstallArgs),
    /// Show installed hooks and tool availability
    Status(status::StatusArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {dir}"))?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::Run(args)) => run::execute(args, custom_config, &output).await,
            Some(Commands::Install(args)) => install::execute(args, &output).await,
            Some(Commands::Uninstall(args)) => uninstall::execute(args, &output).await,
            Some(Commands::Status(args)) => status::execute(args, custom_config, &output).await,
            Some(Commands::Config(args)) => config::execute(args, custom_config).await,
            None => {
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Hook output is read in the terminal running git, keep logs off stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
