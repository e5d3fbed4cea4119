//! Rejection feedback records and their prompt projection.

use crate::{Brief, Format, FormatId, RunId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller decision recorded by a feedback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The format was rejected
    Reject,
}

/// One rejection event, immutable and append-only.
///
/// Snapshots the brief and the rejected format at rejection time, so the
/// record stays meaningful even after the format id is retired or reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FeedbackEntry {
    /// Run the rejection belongs to
    run_id: RunId,
    /// Id of the rejected format
    format_id: FormatId,
    /// Caller decision
    decision: Decision,
    /// Free-text rejection reason
    reason: String,
    /// Brief at time of rejection
    brief_snapshot: Brief,
    /// Rejected format at time of rejection
    format_snapshot: Format,
    /// Creation timestamp; orders the feedback log
    created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    /// Reassembles an entry from persisted parts.
    pub fn from_parts(
        run_id: RunId,
        format_id: FormatId,
        decision: Decision,
        reason: impl Into<String>,
        brief_snapshot: Brief,
        format_snapshot: Format,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            format_id,
            decision,
            reason: reason.into(),
            brief_snapshot,
            format_snapshot,
            created_at,
        }
    }

    /// Creates a rejection entry timestamped now.
    pub fn reject(
        run_id: RunId,
        reason: impl Into<String>,
        brief: Brief,
        format: Format,
    ) -> Self {
        Self {
            run_id,
            format_id: format.id.clone(),
            decision: Decision::Reject,
            reason: reason.into(),
            brief_snapshot: brief,
            format_snapshot: format,
            created_at: Utc::now(),
        }
    }
}

/// Bounded projection of a feedback entry fed back into rework prompts.
///
/// Only decision, format id, reason, and title survive the projection; the
/// full snapshots stay out of the prompt to bound its size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackMemoryItem {
    /// Caller decision
    pub decision: Decision,
    /// Id of the rejected format
    pub format_id: FormatId,
    /// Free-text rejection reason
    pub reason: String,
    /// Title of the rejected format
    pub title: String,
}

impl From<&FeedbackEntry> for FeedbackMemoryItem {
    fn from(entry: &FeedbackEntry) -> Self {
        Self {
            decision: entry.decision,
            format_id: entry.format_id.clone(),
            reason: entry.reason.clone(),
            title: entry.format_snapshot.title.clone(),
        }
    }
}
