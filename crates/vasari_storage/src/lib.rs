//! Feedback-log storage backends for the Vasari content pipeline.
//!
//! Two [`vasari_interface::FeedbackStore`] implementations:
//! - [`MemoryFeedbackStore`] for tests and degraded in-process operation
//! - [`RestFeedbackStore`] for a PostgREST-style HTTP table endpoint

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod rest;

pub use memory::MemoryFeedbackStore;
pub use rest::RestFeedbackStore;
