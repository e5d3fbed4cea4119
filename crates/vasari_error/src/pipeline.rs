//! Pipeline state errors.

/// Kinds of pipeline state errors.
///
/// These are caller mistakes against the run state machine, not generation
/// or storage faults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// No run with the given id
    #[display("Unknown run: {}", _0)]
    UnknownRun(String),
    /// No format with the given id in the run's working set
    #[display("Unknown format: {}", _0)]
    UnknownFormat(String),
    /// A format id would appear twice in the working set
    #[display("Duplicate format id: {}", _0)]
    DuplicateFormat(String),
    /// Script generation requested for a format that is not approved
    #[display("Format not approved: {}", _0)]
    NotApproved(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use vasari_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::UnknownFormat("fmt-009".to_string()));
/// assert!(format!("{}", err).contains("fmt-009"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
