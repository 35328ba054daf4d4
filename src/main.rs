use anyhow::Result;
use clap::Parser;
use visagit::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
