//! Generation error types for schema-constrained model calls.

/// Kinds of generation errors.
///
/// Each variant maps to one failure mode of a single schema-constrained
/// call to the text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The backend could not be reached or returned a server-side fault.
    ///
    /// Transient: safe to retry with backoff at the caller layer.
    #[display("Backend unavailable (status {:?}): {}", status, message)]
    BackendUnavailable {
        /// Upstream HTTP status, if one was received
        status: Option<u16>,
        /// Upstream error message
        message: String,
    },
    /// The backend returned an empty response body.
    #[display("Backend returned an empty response")]
    EmptyOutput,
    /// No JSON value could be recovered from the response text.
    ///
    /// Usually prompt or model drift rather than transience; the raw text is
    /// carried for prompt-tuning diagnostics.
    #[display("No JSON recoverable from model output ({} chars)", raw.len())]
    UnparsableOutput {
        /// The raw response text
        raw: String,
    },
    /// JSON was recovered but failed validation against the declared schema.
    #[display("Schema mismatch: {}", violation)]
    SchemaMismatch {
        /// The raw response text
        raw: String,
        /// The specific structural complaint (missing key, wrong type, ...)
        violation: String,
    },
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use vasari_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyOutput);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
