use thiserror::Error;

/// Errors raised while parsing atoms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtomError {
    /// The atom did not split into exactly object, property, and value.
    #[error("malformed atom {atom:?}: expected 3 parts separated by {separator:?}, got {parts}")]
    Format {
        atom: String,
        separator: String,
        parts: usize,
    },

    #[error("atom separator must not be empty")]
    EmptySeparator,
}

/// Result alias for atom operations.
pub type AtomResult<T> = Result<T, AtomError>;
