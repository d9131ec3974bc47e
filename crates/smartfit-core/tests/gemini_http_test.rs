//! Gemini adapter against a one-shot local HTTP server.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use std::time::Duration;

use smartfit_core::GenerationSettings;
use smartfit_core::generator::{GeminiGenerator, GenerationError, GenerationRequest, TextGenerator};
use smartfit_core::plan::generate_workout_plan;
use smartfit_core::retry::RetryPolicy;
use smartfit_test_utils::sample_user;

/// Serve exactly one request with `status` and `body`; the handle yields
/// the raw request text.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{addr}/v1beta"), handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..split]
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= split + 4 + length
}

fn request() -> GenerationRequest {
    GenerationRequest::new(
        "gemini-2.5-flash",
        "Crie um plano",
        json!({"type": "ARRAY", "items": {"type": "STRING"}}),
    )
}

#[tokio::test]
async fn returns_first_candidate_text() {
    let body = json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": "[\"ok\"]"}]}}]
    })
    .to_string();
    let (base, server) = serve_once("200 OK", body).await;

    let generator = GeminiGenerator::new("test-key").with_base_url(base);
    let text = generator.generate(&request()).await.unwrap();
    assert_eq!(text, "[\"ok\"]");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent HTTP/1.1"));
    assert!(raw.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(raw.contains("\"responseMimeType\":\"application/json\""));
    assert!(raw.contains("Crie um plano"));
}

#[tokio::test]
async fn quota_error_maps_to_rate_limited() {
    let body = json!({"error": {"code": 429, "message": "Resource exhausted"}}).to_string();
    let (base, server) = serve_once("429 Too Many Requests", body).await;

    let generator = GeminiGenerator::new("k").with_base_url(base);
    let err = generator.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::RateLimited { ref message } if message == "Resource exhausted"));
    server.await.unwrap();
}

#[tokio::test]
async fn server_error_keeps_status() {
    let (base, server) = serve_once("503 Service Unavailable", "overloaded".to_owned()).await;

    let generator = GeminiGenerator::new("k").with_base_url(base);
    match generator.generate(&request()).await {
        Err(GenerationError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn blocked_prompt_is_empty_response() {
    let body = json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string();
    let (base, server) = serve_once("200 OK", body).await;

    let generator = GeminiGenerator::new("k").with_base_url(base);
    assert!(matches!(
        generator.generate(&request()).await,
        Err(GenerationError::EmptyResponse)
    ));
    server.await.unwrap();
}

/// Base URL of a local port with nothing listening on it.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1beta")
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    let generator = GeminiGenerator::new("AIzaSECRET_KEY_123").with_base_url(closed_port().await);

    let err = generator.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Http(_)), "got {err:?}");
    assert!(!err.to_string().contains("AIzaSECRET_KEY_123"), "leaked: {err}");
    assert!(!format!("{err:?}").contains("AIzaSECRET_KEY_123"), "leaked: {err:?}");
}

#[tokio::test]
async fn failed_plan_message_does_not_leak_api_key() {
    let generator = GeminiGenerator::new("AIzaSECRET_KEY_123").with_base_url(closed_port().await);
    let mut settings = GenerationSettings::default();
    settings.plan_policy = RetryPolicy {
        timeout: Duration::from_secs(5),
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    let err = generate_workout_plan(&generator, &sample_user(), &settings)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("failed to generate workout plan"));
    assert!(!message.contains("AIzaSECRET_KEY_123"), "leaked: {message}");
}
