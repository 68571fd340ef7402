use anyhow::Result;
use clap::Parser;
use ivrit::cli::{execute, Cli};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    execute(cli)
}
