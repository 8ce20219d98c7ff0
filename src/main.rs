use anyhow::Result;
use clap::Parser;
use commit_gate::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
