//! Core data types for the Vasari content pipeline.
//!
//! This crate provides the foundation data types shared across the Vasari
//! workspace: the creative brief, candidate formats, production scripts,
//! feedback records, trend context, and the generation request/response pair.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brief;
mod feedback;
mod format;
mod request;
mod role;
mod run;
mod script;
mod trend;

pub use brief::{
    AwarenessLevel, Brief, BriefBuilder, BriefBuilderError, CampaignObjective, ContentArchetype,
    ContentGoal, CreativeIntent, CreativeIntentBuilder, CreatorType, Deliverable, DesiredReaction,
    EmotionalTone, HookType, Platform, VideoPurpose, NO_CONSTRAINTS,
};
pub use feedback::{Decision, FeedbackEntry, FeedbackMemoryItem};
pub use format::{Disposition, Format, FormatId};
pub use request::{GenerateRequest, GenerateResponse, Message};
pub use role::Role;
pub use run::RunId;
pub use script::{Caption, CreatorPlaybook, Cta, Energy, ExportNotes, Scene, Script, ScriptBatch};
pub use trend::{Confidence, TrendItem};
