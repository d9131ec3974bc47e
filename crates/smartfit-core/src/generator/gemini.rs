//! Google Gemini adapter.
//!
//! Calls `models/{model}:generateContent` with a JSON response schema so
//! the model answers with structured JSON text. One HTTP request per
//! [`TextGenerator::generate`] call.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::trait_def::TextGenerator;
use super::types::{GenerationError, GenerationRequest};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Request header carrying the API key. Keeps the key out of URLs, which
/// `reqwest` errors include in their message.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Base URL for the Gemini REST API.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiGenerator {
    api_key: String,
    base_url: String,
    client: Client,
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_owned(),
            client: Client::new(),
        }
    }

    /// Point the adapter at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn build_body(request: &GenerationRequest) -> GeminiRequest<'_> {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
        if let Some(err) = response.error {
            return Err(GenerationError::Api {
                status: 200,
                message: err.message,
            });
        }

        let text: String = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    fn map_api_error(status: u16, body: &str) -> GenerationError {
        let message = serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_owned(), |e| e.message);

        match status {
            429 => GenerationError::RateLimited { message },
            _ => GenerationError::Api { status, message },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = self.build_url(&request.model);
        let body = Self::build_body(request);

        debug!(prompt_len = request.prompt.len(), "sending request to Gemini");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &text));
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        let content = Self::extract_text(parsed)?;
        debug!(response_len = content.len(), "received response from Gemini");
        Ok(content)
    }
}

/// Drop the URL from a transport error before it reaches logs or the screen.
fn transport_error(err: reqwest::Error) -> GenerationError {
    GenerationError::Http(err.without_url())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_carries_prompt_and_schema() {
        let request = GenerationRequest::new(
            "gemini-2.5-flash",
            "Olá",
            json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        );
        let body = serde_json::to_value(GeminiGenerator::build_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Olá");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn url_includes_model_but_not_key() {
        let g = GeminiGenerator::new("secret").with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(
            g.build_url("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let g = GeminiGenerator::new("super-secret");
        let rendered = format!("{g:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(
            GeminiGenerator::extract_text(response).unwrap(),
            "[{\"a\":1}]"
        );
    }

    #[test]
    fn extract_text_without_candidates_is_empty_response() {
        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            GeminiGenerator::extract_text(response),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn rate_limit_maps_to_rate_limited() {
        let body = r#"{"error": {"message": "Quota exceeded. Please retry in 6.4s."}}"#;
        match GeminiGenerator::map_api_error(429, body) {
            GenerationError::RateLimited { message } => {
                assert!(message.starts_with("Quota exceeded"));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn other_status_keeps_raw_body_when_not_json() {
        match GeminiGenerator::map_api_error(503, "upstream unavailable") {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
