//! OpenAI API client.

use super::types::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument};
use vasari_core::{GenerateRequest, GenerateResponse, Role};
use vasari_error::{ConfigError, GenerationError, GenerationErrorKind, JsonError, VasariResult};
use vasari_interface::TextGenerator;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model identifier (e.g., "gpt-4o-mini")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_MODEL` and
    /// `OPENAI_BASE_URL` (optional), loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> VasariResult<Self> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::new("OPENAI_API_KEY is not set"))?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let mut client = Self::new(api_key, model);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            client.base_url = base_url;
        }
        Ok(client)
    }

    /// Overrides the API base URL (local gateways, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn convert_request(&self, request: &GenerateRequest) -> ChatRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| ChatMessage {
                role: match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: msg.content.clone(),
            })
            .collect();

        ChatRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(skip(self, req), fields(model = req.model.as_deref().unwrap_or(&self.model)))]
    async fn generate(&self, req: &GenerateRequest) -> VasariResult<GenerateResponse> {
        let body = self.convert_request(req);
        debug!(messages = body.messages.len(), "Sending request to OpenAI API");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to OpenAI API");
                GenerationError::new(GenerationErrorKind::BackendUnavailable {
                    status: None,
                    message: format!("Request failed: {}", e),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenAI API returned error");
            return Err(GenerationError::new(GenerationErrorKind::BackendUnavailable {
                status: Some(status.as_u16()),
                message: body,
            })
            .into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse OpenAI response envelope");
            JsonError::new(format!("Failed to parse response: {}", e))
        })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(text_len = text.len(), "Received response from OpenAI");
        Ok(GenerateResponse { text })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasari_core::Message;

    #[test]
    fn convert_request_maps_roles_and_defaults_model() {
        let client = OpenAiClient::new("key", "gpt-4o-mini");
        let req = GenerateRequest {
            messages: vec![Message::system("rules"), Message::user("hi")],
            max_tokens: None,
            temperature: Some(0.6),
            model: None,
        };
        let body = client.convert_request(&req);
        assert_eq!(body.model, "gpt-4o-mini");
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].role, "user");
        assert_eq!(body.temperature, Some(0.6));
    }

    #[test]
    fn explicit_model_wins_over_client_default() {
        let client = OpenAiClient::new("key", "gpt-4o-mini");
        let req = GenerateRequest {
            model: Some("gpt-4.1-mini".to_string()),
            ..GenerateRequest::default()
        };
        assert_eq!(client.convert_request(&req).model, "gpt-4.1-mini");
    }
}
