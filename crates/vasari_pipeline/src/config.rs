//! Pipeline configuration.

use crate::CallParams;

/// Number of candidates produced by the format-generation stage.
pub const FORMAT_BATCH_SIZE: usize = 6;

/// Number of replacement candidates produced per rejection.
pub const REPLACEMENT_COUNT: usize = 2;

/// Tunable knobs of the pipeline.
///
/// # Examples
///
/// ```
/// use vasari_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .model("gpt-4.1-mini".to_string())
///     .feedback_window(8usize)
///     .build()
///     .unwrap();
/// assert_eq!(*config.feedback_window(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct PipelineConfig {
    /// Model override for all stages; `None` uses the backend default
    model: Option<String>,
    /// Sampling temperature for format generation
    formats_temperature: f32,
    /// Sampling temperature for rework
    rework_temperature: f32,
    /// Sampling temperature for script generation
    scripts_temperature: f32,
    /// Output token cap, when bounded
    max_tokens: Option<u32>,
    /// How many recent feedback entries feed rework prompts
    feedback_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: None,
            formats_temperature: 0.6,
            rework_temperature: 0.7,
            scripts_temperature: 0.7,
            max_tokens: None,
            feedback_window: 12,
        }
    }
}

impl PipelineConfig {
    /// Creates a new config builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub(crate) fn formats_params(&self) -> CallParams {
        CallParams {
            model: self.model.clone(),
            temperature: Some(self.formats_temperature),
            max_tokens: self.max_tokens,
        }
    }

    pub(crate) fn rework_params(&self) -> CallParams {
        CallParams {
            model: self.model.clone(),
            temperature: Some(self.rework_temperature),
            max_tokens: self.max_tokens,
        }
    }

    pub(crate) fn scripts_params(&self) -> CallParams {
        CallParams {
            model: self.model.clone(),
            temperature: Some(self.scripts_temperature),
            max_tokens: self.max_tokens,
        }
    }
}
