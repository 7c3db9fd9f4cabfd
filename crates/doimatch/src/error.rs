//! Error types for the doimatch library
//!
//! doimatch uses a unified error type that wraps errors from all
//! sub-components. Recoverable conditions (a malformed record line, an
//! unreadable archive) never surface here; they are logged and absorbed at
//! their local scope. What remains is the fatal setup taxonomy: a broken
//! mapping table, an unusable pattern set, or an output sink that cannot be
//! written.

use thiserror::Error;

/// Main error type for doimatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from automaton construction.
    #[error(transparent)]
    Automaton(#[from] doimatch_ac::AcError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error reading the mapping table or writing the match report.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// The corpus root could not be turned into a valid glob pattern.
    #[error("invalid corpus glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The mapping table yielded zero usable DOI patterns.
    ///
    /// An automaton with no patterns would make the entire run produce no
    /// matches without signaling why, so this is a configuration error
    /// rather than a silent no-op.
    #[error("no usable DOI patterns found in the mapping table")]
    EmptyPatternSet,
}

/// Result type alias for doimatch operations.
pub type Result<T> = std::result::Result<T, Error>;
