//! Adapter interface for generative text services.
//!
//! ```text
//! plan::generate / plan::alternatives
//!     |
//!     |  GenerationRequest { model, prompt, response_schema }
//!     v
//! RetryPolicy::run --(timeout, backoff)--> &dyn TextGenerator
//!                                               |
//!                                         GeminiGenerator  (HTTP)
//!                                         ScriptedGenerator (tests)
//! ```

pub mod gemini;
pub mod trait_def;
pub mod types;

pub use gemini::GeminiGenerator;
pub use trait_def::TextGenerator;
pub use types::{DEFAULT_MODEL, GenerationError, GenerationRequest};
