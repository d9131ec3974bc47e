//! Request and error types shared by every [`super::TextGenerator`].

use std::time::Duration;

use thiserror::Error;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// One schema-constrained text completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Free-text prompt.
    pub prompt: String,
    /// Output schema the service must conform to (Gemini OpenAPI subset).
    pub response_schema: serde_json::Value,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        response_schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response_schema,
        }
    }
}

/// Failures talking to the text-generation service or reading its answer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI service quota exceeded: {message}")]
    RateLimited { message: String },

    #[error("no response from the AI service")]
    EmptyResponse,

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("AI response does not match the expected format: {0}")]
    Parse(#[from] serde_json::Error),
}
