use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};
use rainbow_core::Table;
use tracing::info;

use crate::args::LookupArgs;

pub fn run(args: LookupArgs) -> Result<()> {
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

    let file =
        File::open(&args.table).with_context(|| format!("failed to open {:?}", args.table))?;
    table
        .load(BufReader::new(file))
        .context("failed to load table")?;

    let target = hex::decode(args.target.trim()).context("target is not valid hex")?;
    if target.len() != table.digest_size() {
        bail!(
            "target is {} bytes, table expects {} bytes for this hash algorithm",
            target.len(),
            table.digest_size()
        );
    }

    info!(signature = table.signature(), "looking up target");
    match table.lookup(&target).context("lookup failed")? {
        Some(password) => println!("{}", hex::encode(password)),
        None => {
            println!("not found");
            std::process::exit(1);
        }
    }

    Ok(())
}
