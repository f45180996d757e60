use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use rainbow_core::Table;
use tracing::info;

use crate::args::GenerateArgs;

pub fn run(args: GenerateArgs) -> Result<()> {
    let shape = args.shape;

    let mut table = match shape.seed {
        Some(seed) => Table::with_seed(shape.hash.into(), shape.chain_length, seed),
        None => Table::new(shape.hash.into(), shape.chain_length),
    }
    .context("failed to configure table")?
    .compile_alphabet(&shape.alphabet, shape.min_len, shape.max_len)
    .context("failed to compile alphabet module")?
    .build()
    .context("failed to build table")?;

    info!(signature = table.signature(), "generating chains");
    table
        .generate_chains(args.count)
        .context("failed to generate chains")?;

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {:?}", args.output))?;
    table
        .save(BufWriter::new(file))
        .context("failed to save table")?;

    println!("saved {} chains to {:?}", table.len(), args.output);
    Ok(())
}
