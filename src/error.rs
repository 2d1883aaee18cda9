//! Error types
//!
//! Every failure aborts the construction of the current word or block; nothing
//! partial is ever handed back to the caller.

use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A known letter was followed by text none of its patterns accept
    #[error("word '{letter}' value invalid: '{text}'")]
    WordValueInvalid { letter: char, text: String },

    /// Scanning stopped with non-whitespace text left over
    #[error("block code remaining '{remainder}'")]
    LeftoverText { remainder: String },

    /// The single-word parser saw zero or several words
    #[error("expected exactly one word, found {count}")]
    SingleWordArity { count: usize },

    /// Two instructions of one block are defined by the same word
    #[error("'{first}' and '{second}' cannot be in the same block")]
    SameCodeInBlock { first: String, second: String },

    /// Two instructions of one block belong to the same modal group
    #[error("'{first}' and '{second}' cannot be in the same block (modal group '{group}')")]
    SameModalGroupInBlock {
        group: String,
        first: String,
        second: String,
    },

    /// Per-letter lookup with a letter the dialect does not define
    #[error("letter '{letter}' is not defined by dialect '{dialect}'")]
    UnknownDialectLetter { letter: char, dialect: String },

    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),

    #[error("invalid decimal precision {value}: expected an integer between 0 and {max}")]
    InvalidPrecision { value: i64, max: u8 },

    /// A dialect definition could not be turned into word rules
    #[error("invalid definition for dialect '{dialect}': {message}")]
    InvalidDialect { dialect: String, message: String },
}

impl Error {
    /// Stable identifier of the error kind, independent of the message text
    pub fn kind(&self) -> &'static str {
        match self {
            Error::WordValueInvalid { .. } => "word-value-invalid",
            Error::LeftoverText { .. } => "leftover-text",
            Error::SingleWordArity { .. } => "single-word-arity",
            Error::SameCodeInBlock { .. } => "same-code-in-block",
            Error::SameModalGroupInBlock { .. } => "same-modal-group-in-block",
            Error::UnknownDialectLetter { .. } => "unknown-dialect-letter",
            Error::UnknownDialect(_) => "unknown-dialect",
            Error::InvalidPrecision { .. } => "invalid-precision",
            Error::InvalidDialect { .. } => "invalid-dialect",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
