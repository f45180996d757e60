use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rainbow_core::HashAlgo;

/// The hash algorithms exposed on the command line.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum HashAlgoArg {
    Md4,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3224,
    Sha3256,
    Sha3384,
    Sha3512,
}

impl From<HashAlgoArg> for HashAlgo {
    fn from(arg: HashAlgoArg) -> Self {
        match arg {
            HashAlgoArg::Md4 => HashAlgo::Md4,
            HashAlgoArg::Md5 => HashAlgo::Md5,
            HashAlgoArg::Sha1 => HashAlgo::Sha1,
            HashAlgoArg::Sha224 => HashAlgo::Sha224,
            HashAlgoArg::Sha256 => HashAlgo::Sha256,
            HashAlgoArg::Sha384 => HashAlgo::Sha384,
            HashAlgoArg::Sha512 => HashAlgo::Sha512,
            HashAlgoArg::Sha3224 => HashAlgo::Sha3_224,
            HashAlgoArg::Sha3256 => HashAlgo::Sha3_256,
            HashAlgoArg::Sha3384 => HashAlgo::Sha3_384,
            HashAlgoArg::Sha3512 => HashAlgo::Sha3_512,
        }
    }
}

/// Shared knobs that define a table's namespace: both `generate` and
/// `lookup` must agree on these or the saved signature won't match.
#[derive(Args, Clone)]
pub struct TableShape {
    /// Hash algorithm the table is built around.
    #[arg(long, value_enum, default_value_t = HashAlgoArg::Md5)]
    pub hash: HashAlgoArg,

    /// Number of reduce/hash alternations per chain.
    #[arg(long, default_value_t = rainbow_core::DEFAULT_CHAIN_LENGTH)]
    pub chain_length: usize,

    /// The alphabet reduce modules draw passwords from.
    #[arg(long, default_value = rainbow_core::DEFAULT_ALPHABET)]
    pub alphabet: String,

    /// Minimum password length sampled from the alphabet.
    #[arg(long, default_value_t = rainbow_core::DEFAULT_MIN_LENGTH)]
    pub min_len: usize,

    /// Maximum password length sampled from the alphabet.
    #[arg(long, default_value_t = rainbow_core::DEFAULT_MAX_LENGTH)]
    pub max_len: usize,

    /// Seed the chain-generation RNG for reproducible tables.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub shape: TableShape,

    /// How many chains to generate.
    #[arg(long, default_value_t = 10_000)]
    pub count: usize,

    /// Where to write the saved table.
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct LookupArgs {
    #[command(flatten)]
    pub shape: TableShape,

    /// The saved table to load.
    #[arg(long)]
    pub table: PathBuf,

    /// The hash to reverse, hex-encoded.
    #[arg(long)]
    pub target: String,
}
