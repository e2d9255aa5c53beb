//! Error types for the folio-index crate.

use std::{io, path::PathBuf};

use folio_query::QueryError;
use tantivy::TantivyError;
use thiserror::Error;

/// Errors that can occur when working with the page index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Storage could not be opened, read, written or committed.
    ///
    /// The last committed snapshot is still intact, so the operation can be retried.
    #[error("index unavailable during {operation}: {message}")]
    Unavailable {
        /// The operation that failed, e.g. `commit`.
        operation: &'static str,
        /// Error message from the storage layer.
        message: String,
    },

    /// The index on disk is unreadable and could not be replaced with an empty one.
    #[error("index at {path} is corrupt: {message}")]
    Corrupt {
        /// Path to the index directory.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),

    /// The query could not be parsed or resolved.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl IndexError {
    /// Creates an `Unavailable` error for an open failure.
    pub(crate) fn open(source: &TantivyError) -> Self {
        Self::unavailable("open", source)
    }

    /// Creates an `Unavailable` error for a write failure.
    pub(crate) fn write(source: &TantivyError) -> Self {
        Self::unavailable("write", source)
    }

    /// Creates an `Unavailable` error for a commit failure.
    pub(crate) fn commit(source: &TantivyError) -> Self {
        Self::unavailable("commit", source)
    }

    /// Creates an `Unavailable` error for a read failure.
    pub(crate) fn read(source: &TantivyError) -> Self {
        Self::unavailable("read", source)
    }

    /// Error for operations attempted after the writer was lost.
    pub(crate) fn writer_gone() -> Self {
        Self::Unavailable {
            operation: "write",
            message: "index writer is not available; reopen the index".to_string(),
        }
    }

    /// Creates an `Unavailable` error for `operation`.
    fn unavailable(operation: &'static str, source: &TantivyError) -> Self {
        Self::Unavailable {
            operation,
            message: source.to_string(),
        }
    }

    /// Returns true if retrying the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Io(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unavailable_is_retryable() {
        let err = IndexError::commit(&TantivyError::InternalError("disk full".into()));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("commit"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn language_error_is_not_retryable() {
        assert!(!IndexError::InvalidLanguage("klingon".into()).is_retryable());
    }

    #[test]
    fn query_error_is_transparent() {
        let err = IndexError::from(QueryError::compile("nested field qualifier 'x:'"));
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("query error: nested field"));
    }
}
