use std::io;

use anyhow::Context;
use bt_ledger::Chain;
use bt_store::InMemoryStore;
use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .init();

    let config = cli.chain_config()?;
    let chain = Chain::genesis(InMemoryStore::new(), config).context("failed to create chain")?;
    commands::repl(&chain, io::stdin().lock(), io::stdout().lock())
}
