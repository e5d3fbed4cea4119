//! Production scripts and their nested records.

use crate::FormatId;
use serde::{Deserialize, Serialize};

/// One scene of a script, in shooting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Timestamp label ("0-3s")
    pub t: String,
    /// Visual description
    pub visual: String,
    /// On-screen overlay text
    pub on_screen_text: String,
    /// Spoken line
    pub spoken_line: String,
    /// Camera notes
    pub camera_notes: String,
}

/// Caption block for the published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Caption text
    pub text: String,
    /// Hashtag list
    pub hashtags: Vec<String>,
}

/// Call-to-action block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cta {
    /// CTA type ("save", "comment keyword", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// The CTA line as spoken or written
    pub line: String,
}

/// Delivery energy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    /// Low-key delivery
    Low,
    /// Medium energy
    Medium,
    /// High energy
    High,
}

/// Creator-facing delivery guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorPlaybook {
    /// How to deliver the lines
    pub delivery_style: String,
    /// Delivery energy level
    pub energy: Energy,
    /// Things to do
    pub dos: Vec<String>,
    /// Things to avoid
    pub donts: Vec<String>,
    /// Editing notes
    pub editing_notes: String,
}

/// The fully detailed production plan for one approved format.
///
/// The (`format_id`, `script_title`) pair is the natural key within a run.
/// Scripts are immutable; regenerating for a format replaces its prior set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Id of the parent format
    pub format_id: FormatId,
    /// Script title
    pub script_title: String,
    /// Target duration in seconds
    pub duration_seconds: u32,
    /// Ordered scene sequence
    pub scene_by_scene: Vec<Scene>,
    /// Caption block
    pub caption: Caption,
    /// Call-to-action block
    pub cta: Cta,
    /// Creator-facing delivery guidance
    pub creator_playbook: CreatorPlaybook,
}

/// Usage notes attached to a script batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNotes {
    /// How to hand the batch to a creator
    pub how_to_use: String,
    /// Assumptions made while generating, including auto-wrap diagnostics
    pub assumptions: Vec<String>,
}

/// A batch of scripts as returned by the script-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptBatch {
    /// The generated scripts
    pub scripts: Vec<Script>,
    /// Usage notes; synthesized when the backend returned a bare array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_notes: Option<ExportNotes>,
}
