//! Trend descriptors harvested upstream.
//!
//! The harvesting job is an external collaborator; the pipeline treats
//! these records as opaque prompt context and never validates or stores
//! them.

use serde::{Deserialize, Serialize};

/// Harvester confidence in a trend item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Multiple strong sources
    High,
    /// Some corroboration
    Medium,
    /// Single or weak source
    Low,
}

/// One replicable trend pattern from the upstream corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    /// Stable slug
    pub trend_id: String,
    /// Topic tags
    #[serde(default)]
    pub topic_tags: Vec<String>,
    /// Platform tags ("instagram", "tiktok")
    #[serde(default)]
    pub platform_tags: Vec<String>,
    /// Format archetype ("POV confession", "3-step tutorial", ...)
    pub format_archetype: String,
    /// Hook type ("contrarian", "number", "story", "promise")
    pub hook_type: String,
    /// Short hook examples
    #[serde(default)]
    pub hook_examples: Vec<String>,
    /// Script beats
    #[serde(default)]
    pub script_beats: Vec<String>,
    /// CTA type
    pub cta_type: String,
    /// Duration hint in seconds, when the sources agree on one
    #[serde(default)]
    pub duration_hint_seconds: Option<u32>,
    /// Engagement drivers ("pattern interruption", "specificity", ...)
    #[serde(default)]
    pub engagement_drivers: Vec<String>,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Harvester confidence
    pub confidence: Confidence,
}
