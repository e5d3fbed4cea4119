#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Content-generation pipeline: brief submission, candidate format review,
//! feedback-steered rework, and production-script generation.
//!
//! The crate is organized around three stages ([`FormatStage`],
//! [`ReworkStage`], [`ScriptStage`]) that share one [`StructuredGenerator`]
//! and never touch run state, plus an [`Orchestrator`] that owns the per-run
//! working sets and sequences the stages. Backends and feedback stores come
//! in through the traits in `vasari_interface`, so the whole pipeline runs
//! against in-memory fakes in tests.

mod config;
mod extraction;
mod formats;
mod generator;
mod orchestrator;
mod prompt;
mod rework;
mod run;
mod schema;
mod scripts;

pub use config::{FORMAT_BATCH_SIZE, PipelineConfig, PipelineConfigBuilder, REPLACEMENT_COUNT};
pub use extraction::extract_json;
pub use formats::FormatStage;
pub use generator::{CallParams, StructuredGenerator};
pub use orchestrator::{Orchestrator, RunSummary};
pub use prompt::PromptSpec;
pub use rework::{DEFAULT_REWORK_REASON, ReworkOutcome, ReworkStage};
pub use run::{FormatSlot, PipelineRun, WorkingSet};
pub use schema::Schema;
pub use scripts::ScriptStage;
