//! Format-generation stage: brief in, six candidate formats out.

use crate::{FORMAT_BATCH_SIZE, PipelineConfig, PromptSpec, Schema, StructuredGenerator};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use vasari_core::{Brief, Format, FormatId, TrendItem};
use vasari_error::{GenerationError, GenerationErrorKind, VasariResult};

/// Top-level payload demanded from the model.
#[derive(Debug, Deserialize)]
struct FormatsPayload {
    formats: Vec<Format>,
}

fn format_item_schema() -> Schema {
    Schema::Object {
        required: vec![
            ("id", Schema::String),
            ("title", Schema::String),
            ("description", Schema::String),
            ("goal", Schema::String),
            ("trends", Schema::array(Schema::String)),
        ],
        optional: vec![],
    }
}

fn batch_schema() -> Schema {
    Schema::Object {
        required: vec![(
            "formats",
            Schema::array_exact(format_item_schema(), FORMAT_BATCH_SIZE),
        )],
        optional: vec![],
    }
}

/// Produces the initial candidate batch for a brief.
#[derive(Debug, Clone)]
pub struct FormatStage {
    generator: StructuredGenerator,
    config: PipelineConfig,
}

impl FormatStage {
    /// Creates the stage.
    pub fn new(generator: StructuredGenerator, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    /// Generates exactly six formats with ids `fmt-001`..`fmt-006`.
    ///
    /// Trend items, when supplied, are rendered as opaque prompt context.
    ///
    /// # Errors
    ///
    /// A wrong candidate count or malformed ids is a `SchemaMismatch`; the
    /// stage never truncates or pads — the caller decides whether to retry.
    #[instrument(skip_all, fields(topic = %brief.topic(), trends = trends.len()))]
    pub async fn generate_formats(
        &self,
        brief: &Brief,
        trends: &[TrendItem],
    ) -> VasariResult<Vec<Format>> {
        let mut spec = PromptSpec::new(self.instructions(brief))
            .with_system("Rispondi solo con JSON valido.")
            .with_context("BRIEF", json!(brief));
        if !trends.is_empty() {
            spec = spec.with_context("TREND RECENTI", json!(trends));
        }

        let value = self
            .generator
            .generate(&spec, &batch_schema(), &self.config.formats_params())
            .await?;
        let raw = value.to_string();

        let payload: FormatsPayload = serde_json::from_value(value).map_err(|e| {
            GenerationError::new(GenerationErrorKind::SchemaMismatch {
                raw: raw.clone(),
                violation: e.to_string(),
            })
        })?;

        // The schema pins the count; ids are positional and checked here.
        for (i, format) in payload.formats.iter().enumerate() {
            let expected = FormatId::batch(i + 1);
            if format.id != expected {
                return Err(GenerationError::new(GenerationErrorKind::SchemaMismatch {
                    raw,
                    violation: format!(
                        "formats[{i}].id: expected '{expected}', got '{}'",
                        format.id
                    ),
                })
                .into());
            }
        }

        info!(count = payload.formats.len(), "Generated format batch");
        Ok(payload.formats)
    }

    fn instructions(&self, brief: &Brief) -> String {
        let mut lines = vec![
            "Sei un Format Designer per Reels UGC (Italia).".to_string(),
            format!(
                "Genera ESATTAMENTE {} format coerenti con il brief.",
                FORMAT_BATCH_SIZE
            ),
        ];
        if brief.reference_script().is_some() {
            lines.push(
                "Se nel brief c'è \"reference_script\", usalo come riferimento per ritmo/struttura/tono senza copiare frasi."
                    .to_string(),
            );
        }
        if brief
            .creative_intent()
            .as_ref()
            .is_some_and(|intent| !intent.mandatory_elements().is_empty())
        {
            lines.push(
                "Assicurati che i \"mandatory_elements\" del brief siano esplicitamente inclusi nel format (titolo o descrizione)."
                    .to_string(),
            );
        }
        lines.push("VINCOLI:".to_string());
        lines.push("- Rispetta constraints e CTA.".to_string());
        lines.push(format!(
            "- id deve essere fmt-001..fmt-{:03}.",
            FORMAT_BATCH_SIZE
        ));
        lines.join("\n")
    }
}
