//! LLM provider abstraction
//!
//! Turns a conversation snapshot into one generation request and the reply
//! back into plain text.

mod config;
mod error;
pub mod gemini;
#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use config::{LlmConfig, API_KEY_ENV};
pub use error::{LlmError, LlmErrorKind, MISSING_KEY_MESSAGE};
pub use gemini::{build_contents, extract_text, GeminiModel, GeminiService};

use crate::conversation::Turn;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything needed for one generation attempt
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// Full history; the endpoint keeps no state between calls
    pub turns: &'a [Turn],
    pub system_prompt: Option<&'a str>,
    /// Key entered for this session, if any
    pub session_key: Option<&'a str>,
}

impl<'a> GenerateRequest<'a> {
    #[must_use]
    pub fn new(turns: &'a [Turn]) -> Self {
        Self {
            turns,
            system_prompt: None,
            session_key: None,
        }
    }
}

/// Common interface for generation backends
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Produce the assistant reply for the given history
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    #[must_use]
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    turns = request.turns.len(),
                    reply_chars = text.chars().count(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    turns = request.turns.len(),
                    kind = e.kind().as_str(),
                    error = %e,
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
