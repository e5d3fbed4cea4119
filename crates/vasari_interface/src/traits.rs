//! Trait definitions for generation backends and feedback storage.

use async_trait::async_trait;
use vasari_core::{FeedbackEntry, GenerateRequest, GenerateResponse, RunId};
use vasari_error::VasariResult;

/// Core trait that all text-generation backends must implement.
///
/// One call issues exactly one request to the backend; retry policy belongs
/// to the caller, never to the implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate model output for the given request.
    async fn generate(&self, req: &GenerateRequest) -> VasariResult<GenerateResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Append-only feedback log scoped to pipeline runs.
///
/// The pipeline requires only these two operations; transactions, joins,
/// and schema administration are collaborator concerns.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Append one rejection record.
    async fn append(&self, entry: &FeedbackEntry) -> VasariResult<()>;

    /// The most recent records for a run, most-recent-first, at most `limit`.
    async fn query_recent(&self, run_id: &RunId, limit: usize) -> VasariResult<Vec<FeedbackEntry>>;
}
