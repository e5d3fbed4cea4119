//! The schema-constrained generator.
//!
//! Wraps a single call to the text-generation backend with a fixed output
//! contract. Issues exactly one request per call; retry policy belongs to
//! the caller. Never mutates pipeline state.

use crate::{PromptSpec, Schema, extract_json};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use vasari_core::GenerateRequest;
use vasari_error::{GenerationError, GenerationErrorKind, VasariResult};
use vasari_interface::TextGenerator;

/// Per-call generation parameters, set per stage by the pipeline config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallParams {
    /// Model override; `None` uses the backend default
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_tokens: Option<u32>,
}

/// Generator enforcing a declared output shape on a single backend call.
#[derive(Clone)]
pub struct StructuredGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl StructuredGenerator {
    /// Creates a generator over an injected backend.
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// One backend call returning the extracted, unvalidated JSON value
    /// alongside the raw response text.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` on transport/backend faults, `EmptyOutput` on an
    /// empty body, `UnparsableOutput` when no JSON is recoverable.
    pub async fn generate_value(
        &self,
        spec: &PromptSpec,
        contract: &str,
        params: &CallParams,
    ) -> VasariResult<(Value, String)> {
        let request = GenerateRequest {
            messages: spec.render(contract),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            model: params.model.clone(),
        };

        let response = self.backend.generate(&request).await?;
        let raw = response.text;

        if raw.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyOutput).into());
        }

        let Some(value) = extract_json(&raw) else {
            error!(raw = %raw, "No JSON recoverable from model output");
            return Err(
                GenerationError::new(GenerationErrorKind::UnparsableOutput { raw }).into(),
            );
        };

        debug!(raw_len = raw.len(), "Extracted JSON from model output");
        Ok((value, raw))
    }

    /// One backend call returning a value validated against `schema`.
    ///
    /// # Errors
    ///
    /// Everything `generate_value` returns, plus `SchemaMismatch` carrying
    /// the raw text and the specific violated field.
    pub async fn generate(
        &self,
        spec: &PromptSpec,
        schema: &Schema,
        params: &CallParams,
    ) -> VasariResult<Value> {
        let (value, raw) = self
            .generate_value(spec, &schema.instructions(), params)
            .await?;

        if let Err(violation) = schema.validate(&value) {
            error!(violation = %violation, "Model output failed schema validation");
            return Err(
                GenerationError::new(GenerationErrorKind::SchemaMismatch { raw, violation })
                    .into(),
            );
        }

        Ok(value)
    }

    /// Provider name of the underlying backend.
    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }
}

impl std::fmt::Debug for StructuredGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredGenerator")
            .field("provider", &self.backend.provider_name())
            .finish()
    }
}
