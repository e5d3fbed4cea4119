//! Error types for the Vasari content pipeline.
//!
//! This crate provides the foundation error types used throughout the Vasari
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vasari_error::{VasariResult, ConfigError};
//!
//! fn fetch_data() -> VasariResult<String> {
//!     Err(ConfigError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod pipeline;
mod storage;

pub use config::ConfigError;
pub use error::{VasariError, VasariErrorKind, VasariResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
