//! Trait interfaces for the Vasari content pipeline.
//!
//! These seams decouple the pipeline from concrete backends: the
//! text-generation service and the feedback log are injected as trait
//! objects, which keeps the stages testable with scripted doubles and avoids
//! hidden process-wide state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{FeedbackStore, TextGenerator};
