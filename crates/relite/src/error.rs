#![forbid(unsafe_code)]

//! Errors reported by properties and observable collections.

/// Errors from property access and collection mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactiveError {
    /// `get` or `set` on a property constructed without any accessor strategy.
    UnboundProperty,
    /// A position outside the collection.
    IndexOutOfBounds { index: usize, len: usize },
    /// A removal range that is reversed or runs past the end.
    InvalidRange { start: usize, end: usize, len: usize },
}

impl std::fmt::Display for ReactiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnboundProperty => write!(f, "property has no getter/setter bound"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for collection of length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(
                    f,
                    "range {start}..{end} invalid for collection of length {len}"
                )
            }
        }
    }
}

impl std::error::Error for ReactiveError {}

/// Result alias for fallible relite operations.
pub type Result<T> = std::result::Result<T, ReactiveError>;
