//! Storage error types for the feedback log.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
    /// Append of a feedback record was rejected
    #[display("Append failed: {}", _0)]
    AppendFailed(String),
    /// Query for recent feedback records failed
    #[display("Query failed: {}", _0)]
    QueryFailed(String),
    /// A record could not be serialized or deserialized
    #[display("Invalid record: {}", _0)]
    InvalidRecord(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use vasari_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Unavailable("connection reset".to_string()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
