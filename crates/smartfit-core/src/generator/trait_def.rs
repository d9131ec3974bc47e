//! The `TextGenerator` trait -- the adapter interface for AI text services.
//!
//! The plan and alternative-exercise clients only ever talk to this trait,
//! so tests substitute a scripted implementation and the CLI plugs in
//! [`super::GeminiGenerator`].

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{GenerationError, GenerationRequest};

/// A service that turns a prompt plus output schema into JSON text.
///
/// The trait is object-safe so the session can hold an
/// `Arc<dyn TextGenerator>` and hand clones to background tasks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for this generator (e.g. "gemini").
    fn name(&self) -> &str;

    /// Issue one request and return the raw response text.
    ///
    /// Implementations perform a single attempt; timeouts and retries are
    /// applied by the caller's [`crate::retry::RetryPolicy`].
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request).await
    }
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back, used only to prove the trait can be
    /// implemented and used as `dyn TextGenerator`.
    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(request.prompt.clone())
        }
    }

    #[tokio::test]
    async fn generator_is_object_safe() {
        let generator: Arc<dyn TextGenerator> = Arc::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");

        let request = GenerationRequest::new("m", "hello", serde_json::json!({}));
        assert_eq!(generator.generate(&request).await.unwrap(), "hello");
    }
}
