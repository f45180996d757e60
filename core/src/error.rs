use thiserror::Error;

/// The result type returned by every fallible operation on [`crate::Table`].
pub type RainbowResult<T> = Result<T, RainbowError>;

/// Everything that can go wrong while configuring, building, generating,
/// looking up against, or persisting a rainbow table.
#[derive(Error, Debug)]
pub enum RainbowError {
    /// Invalid module parameters, unknown hash algorithm, building twice,
    /// or building with zero modules registered.
    #[error("invalid table configuration: {0}")]
    Config(String),

    /// An operation was invoked in the wrong lifecycle phase, e.g. generating
    /// a chain before `build()`, or compiling a module after `build()`.
    #[error("operation is not valid in the table's current lifecycle state: {0}")]
    State(String),

    /// `load()` saw a signature that does not byte-for-byte match this
    /// table's own signature. The table's existing chains are left untouched.
    #[error("loaded table signature does not match this table's configuration")]
    SignatureMismatch,

    /// The byte stream was truncated, declared an oversize length, or
    /// otherwise failed to parse as a well-formed table.
    #[error("malformed table data: {0}")]
    Format(String),

    /// The underlying reader or writer failed.
    #[error("I/O error while accessing the table stream")]
    Io(#[from] std::io::Error),
}
