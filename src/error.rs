//! Error types for the packed Hilbert R-tree.
//!
//! Every error is a synchronous precondition violation reported at the
//! offending call. There are no recoverable failures and no partial results;
//! callers treat any of these as a programming bug.

use thiserror::Error;

/// Result type alias using [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised by index construction, population, and querying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The constructor was handed an item count of zero.
    #[error("expected a positive number of items")]
    NoItems,

    /// `add` was called more times than the declared item count allows,
    /// or after the index was finished.
    #[error("index capacity of {num_items} items exceeded")]
    IndexFull { num_items: usize },

    /// `finish` was called before every declared item was added, or a
    /// second time on an already-finished index.
    #[error("added {got} items when expected {expected}")]
    ItemCountMismatch { expected: usize, got: usize },

    /// A query was attempted before `finish`.
    #[error("data not yet indexed - call finish() before searching")]
    NotFinished,

    /// A restored buffer does not have the length implied by the supplied
    /// item count and node size.
    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// A raw byte buffer cannot be split into whole elements.
    #[error("byte length {len} is not a multiple of the {elem}-byte element width")]
    InvalidByteLength { len: usize, elem: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            IndexError::NoItems.to_string(),
            "expected a positive number of items"
        );
        assert_eq!(
            IndexError::IndexFull { num_items: 8 }.to_string(),
            "index capacity of 8 items exceeded"
        );
        assert_eq!(
            IndexError::ItemCountMismatch { expected: 10, got: 7 }.to_string(),
            "added 7 items when expected 10"
        );
        assert_eq!(
            IndexError::NotFinished.to_string(),
            "data not yet indexed - call finish() before searching"
        );
        assert_eq!(
            IndexError::BufferMismatch { expected: 30, actual: 25 }.to_string(),
            "buffer length mismatch: expected 30 elements, got 25"
        );
        assert_eq!(
            IndexError::InvalidByteLength { len: 13, elem: 8 }.to_string(),
            "byte length 13 is not a multiple of the 8-byte element width"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndexError>();
    }
}
