//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, JsonError, PipelineError, StorageError};

/// This is the foundation error enum. Variants cover every crate in the
/// Vasari workspace.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariError, JsonError};
///
/// let json_err = JsonError::new("Unexpected end of input");
/// let err: VasariError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VasariErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Schema-constrained generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Feedback storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Pipeline state error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Vasari error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariResult, ConfigError};
///
/// fn might_fail() -> VasariResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vasari Error: {}", _0)]
pub struct VasariError(Box<VasariErrorKind>);

impl VasariError {
    /// Create a new error from a kind.
    pub fn new(kind: VasariErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VasariErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VasariErrorKind
impl<T> From<T> for VasariError
where
    T: Into<VasariErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vasari operations.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariResult, StorageError, StorageErrorKind};
///
/// fn fetch_data() -> VasariResult<String> {
///     Err(StorageError::new(StorageErrorKind::Unavailable("404".to_string())))?
/// }
/// ```
pub type VasariResult<T> = std::result::Result<T, VasariError>;
