//! Feedback & rework stage: one rejection in, two replacement candidates
//! out, steered by a bounded window of past feedback.

use crate::{PipelineConfig, PromptSpec, REPLACEMENT_COUNT, Schema, StructuredGenerator};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use vasari_core::{Brief, FeedbackEntry, FeedbackMemoryItem, Format, RunId};
use vasari_error::{GenerationError, GenerationErrorKind, VasariResult};
use vasari_interface::FeedbackStore;

/// Substituted when the caller rejects without giving a reason.
pub const DEFAULT_REWORK_REASON: &str = "Rendi questo format più in target e più performante.";

/// What the rework stage hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ReworkOutcome {
    /// Conversational note from the model, when it offered one
    assistant_message: Option<String>,
    /// Exactly two replacement candidates, in splice order
    replacements: Vec<Format>,
}

#[derive(Debug, Deserialize)]
struct ReworkPayload {
    #[serde(default)]
    assistant_message: Option<String>,
    replacements: Vec<Format>,
}

fn replacement_item_schema() -> Schema {
    Schema::Object {
        required: vec![
            ("id", Schema::String),
            ("title", Schema::String),
            ("description", Schema::String),
            ("goal", Schema::String),
            ("trends", Schema::array(Schema::String)),
            ("why_this_works", Schema::array(Schema::String)),
        ],
        optional: vec![],
    }
}

fn rework_schema() -> Schema {
    Schema::Object {
        required: vec![(
            "replacements",
            Schema::array_exact(replacement_item_schema(), REPLACEMENT_COUNT),
        )],
        optional: vec![("assistant_message", Schema::String)],
    }
}

/// Produces replacement candidates for a rejected format.
#[derive(Clone)]
pub struct ReworkStage {
    generator: StructuredGenerator,
    store: Arc<dyn FeedbackStore>,
    config: PipelineConfig,
}

impl std::fmt::Debug for ReworkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReworkStage")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

impl ReworkStage {
    /// Creates the stage.
    pub fn new(
        generator: StructuredGenerator,
        store: Arc<dyn FeedbackStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    /// Records the rejection and generates exactly two replacements.
    ///
    /// The feedback append is best-effort: losing an audit record must never
    /// block the creative workflow, so persistence faults are logged and the
    /// stage proceeds with the context it has in hand. The returned formats
    /// are not yet spliced into any working set; committing the replacement
    /// is the orchestrator's move.
    ///
    /// # Errors
    ///
    /// Generation faults per the standard taxonomy; replacement ids that are
    /// not `<rejected>a`/`<rejected>b` are a `SchemaMismatch`.
    #[instrument(skip_all, fields(run_id = %run_id, format_id = %rejected.id))]
    pub async fn rework(
        &self,
        run_id: &RunId,
        brief: &Brief,
        rejected: &Format,
        reason: &str,
    ) -> VasariResult<ReworkOutcome> {
        let reason = match reason.trim() {
            "" => DEFAULT_REWORK_REASON.to_string(),
            trimmed => trimmed.to_string(),
        };

        let entry = FeedbackEntry::reject(
            run_id.clone(),
            reason.clone(),
            brief.clone(),
            rejected.clone(),
        );
        if let Err(e) = self.store.append(&entry).await {
            warn!(error = %e, "Feedback append failed; continuing without persistence");
        }

        let memory = self.recent_memory(run_id, &entry).await;

        let (id_a, id_b) = rejected.id.rework_pair();
        let spec = PromptSpec::new(format!(
            "Sei un Format & Concept Designer per Reels UGC (Italia).\n\
             OBIETTIVO:\n\
             Genera ESATTAMENTE {} alternative SOLO per questo format, più in target secondo il motivo rifiuto.\n\
             - Mantieni coerenza con vincoli, CTA, tone, target.\n\
             - Se ci sono parole vietate / no claim medici: rispettali.\n\
             - id deve essere \"{}\" e \"{}\".",
            REPLACEMENT_COUNT, id_a, id_b
        ))
        .with_context("BRIEF", json!(brief))
        .with_context("FORMAT RIFIUTATO", json!(rejected))
        .with_context("MOTIVO RIFIUTO", json!(reason))
        .with_context("MEMORIA FEEDBACK RECENTI (per evitare errori ripetuti)", json!(memory));

        let value = self
            .generator
            .generate(&spec, &rework_schema(), &self.config.rework_params())
            .await?;
        let raw = value.to_string();

        let payload: ReworkPayload = serde_json::from_value(value).map_err(|e| {
            GenerationError::new(GenerationErrorKind::SchemaMismatch {
                raw: raw.clone(),
                violation: e.to_string(),
            })
        })?;

        let expected = [&id_a, &id_b];
        for (i, format) in payload.replacements.iter().enumerate() {
            if &format.id != expected[i] {
                return Err(GenerationError::new(GenerationErrorKind::SchemaMismatch {
                    raw,
                    violation: format!(
                        "replacements[{i}].id: expected '{}', got '{}'",
                        expected[i], format.id
                    ),
                })
                .into());
            }
        }

        info!(
            replacements = payload.replacements.len(),
            "Generated replacement candidates"
        );
        Ok(ReworkOutcome {
            assistant_message: payload.assistant_message,
            replacements: payload.replacements,
        })
    }

    /// The bounded feedback window, most-recent-first.
    ///
    /// Replaying the full history would grow prompts without bound; twelve
    /// recent entries trade perfect recall for stable prompt size and
    /// latency. When the store cannot be read, the freshly created entry
    /// alone serves as memory.
    async fn recent_memory(
        &self,
        run_id: &RunId,
        fallback: &FeedbackEntry,
    ) -> Vec<FeedbackMemoryItem> {
        match self
            .store
            .query_recent(run_id, *self.config.feedback_window())
            .await
        {
            Ok(entries) => entries.iter().map(FeedbackMemoryItem::from).collect(),
            Err(e) => {
                warn!(error = %e, "Feedback query failed; using in-memory context only");
                vec![FeedbackMemoryItem::from(fallback)]
            }
        }
    }
}
