//! A rainbow-table engine: reduce-function compiler, chain engine, and
//! binary table persistence for reversing a cryptographic hash back to a
//! preimage within a configurable password namespace.
//!
//! ```no_run
//! use rainbow_core::{HashAlgo, Table};
//!
//! let mut table = Table::with_seed(HashAlgo::Md5, 1000, 42)?
//!     .compile_alphabet("abcdefghijklmnopqrstuvwxyz", 4, 6)?
//!     .build()?;
//!
//! table.generate_chains(10_000)?;
//! table.sort_chains()?;
//! # Ok::<(), rainbow_core::RainbowError>(())
//! ```

mod chain;
mod compiler;
mod error;
mod hash;
mod io;
mod reduce;
mod signature;
mod table;

pub use chain::Chain;
pub use error::{RainbowError, RainbowResult};
pub use hash::HashAlgo;
pub use reduce::{transforms, TransformFn};
pub use table::Table;

/// Crate version components embedded in the on-disk signature text. Bumping
/// any of these changes every table's signature.
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// A reasonable default chain length for demos and tests.
pub const DEFAULT_CHAIN_LENGTH: usize = 1000;

/// A reasonable default alphabet: lowercase ASCII letters and digits.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// The default minimum password length used with [`DEFAULT_ALPHABET`].
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// The default maximum password length used with [`DEFAULT_ALPHABET`].
pub const DEFAULT_MAX_LENGTH: usize = 8;
