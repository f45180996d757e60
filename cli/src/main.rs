mod args;
mod generate;
mod lookup;

use anyhow::Result;
use clap::{Parser, Subcommand};

use args::{GenerateArgs, LookupArgs};

/// A small demo over the rainbow-table engine: build a table, generate
/// chains, save them, and look up a hash against a saved table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a table and generate chains into it, saving the result.
    Generate(GenerateArgs),
    /// Load a saved table and recover the password behind a hash.
    Lookup(LookupArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Lookup(args) => lookup::run(args),
    }
}
