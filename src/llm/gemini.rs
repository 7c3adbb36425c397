//! Google Gemini provider implementation
//!
//! The `v1beta` generateContent protocol has no system-role slot, so a system
//! prompt travels as the first `user` entry of `contents`.

use super::{GenerateRequest, LlmError, LlmService};
use crate::conversation::{Role, Turn};
use crate::llm::config::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed per-request timeout; there is one attempt per user turn
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    #[default]
    Gemini25Pro,
    Gemini25Flash,
}

impl GeminiModel {
    pub const ALL: [GeminiModel; 2] = [GeminiModel::Gemini25Pro, GeminiModel::Gemini25Flash];

    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
        }
    }

    #[must_use]
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.api_name() == name)
    }
}

/// URL of the generateContent endpoint for `model`.
#[must_use]
pub fn endpoint_url(base_url: Option<&str>, model: GeminiModel) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/'),
        model.api_name()
    )
}

// ============================================================================
// Request building
// ============================================================================

/// Map a conversation snapshot onto the wire `contents` array.
///
/// The system prompt, when given, becomes one extra leading `user` entry.
/// No truncation or delimiters are applied.
#[must_use]
pub fn build_contents(turns: &[Turn], system_prompt: Option<&str>) -> Vec<GeminiContent> {
    let mut contents = Vec::with_capacity(turns.len() + usize::from(system_prompt.is_some()));

    if let Some(prompt) = system_prompt {
        contents.push(GeminiContent::text(WireRole::User, prompt));
    }

    contents.extend(
        turns
            .iter()
            .map(|turn| GeminiContent::text(WireRole::from(turn.role()), turn.content())),
    );

    contents
}

// ============================================================================
// Response extraction
// ============================================================================

/// Flatten `candidates[0].content.parts[*].text` into one string.
///
/// Part texts are joined with newlines and the result is trimmed. A part
/// without `text` contributes an empty string.
///
/// # Errors
///
/// Any missing or mis-shaped field, an empty `candidates` array, or text that
/// is empty after trimming all produce [`LlmError::MalformedResponse`] carrying
/// the payload.
pub fn extract_text(payload: &Value) -> Result<String, LlmError> {
    let malformed = |reason: &str| {
        tracing::debug!(reason, "Gemini payload does not match expected shape");
        LlmError::malformed(payload.clone())
    };

    // Only candidates[0] is inspected; later candidates may take any shape
    let candidate = payload
        .as_object()
        .and_then(|root| root.get("candidates"))
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("candidates is not an array"))?
        .first()
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("first candidate missing or not an object"))?;

    let parts = candidate
        .get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("content.parts is not an array"))?;

    let mut texts = Vec::with_capacity(parts.len());
    for part in parts {
        let part = part
            .as_object()
            .ok_or_else(|| malformed("part is not an object"))?;
        match part.get("text") {
            None => texts.push(""),
            Some(text) => texts.push(
                text.as_str()
                    .ok_or_else(|| malformed("part text is not a string"))?,
            ),
        }
    }

    let joined = texts.join("\n");
    let text = joined.trim();
    if text.is_empty() {
        tracing::debug!(
            finish_reason = candidate
                .get("finishReason")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown"),
            "Gemini candidate carried no text"
        );
        return Err(LlmError::malformed(payload.clone()));
    }

    Ok(text.to_string())
}

// ============================================================================
// HTTP transport
// ============================================================================

/// Status and body of an HTTP exchange, before interpretation
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST. Separated out so tests can observe (or forbid) traffic.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<HttpReply, LlmError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<HttpReply, LlmError> {
        (**self).post_json(url, api_key, body).await
    }
}

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<HttpReply, LlmError> {
        // without_url() keeps the key (a query parameter) out of error text
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {}", e.without_url()))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {}", e.without_url()))
                } else {
                    LlmError::network(format!("Request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            LlmError::network(format!("Failed to read response: {}", e.without_url()))
        })?;

        Ok(HttpReply { status, body })
    }
}

// ============================================================================
// Service
// ============================================================================

/// Gemini service implementation
pub struct GeminiService<T = ReqwestTransport> {
    transport: T,
    config: LlmConfig,
    url: String,
}

impl GeminiService<ReqwestTransport> {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let transport = ReqwestTransport::new(REQUEST_TIMEOUT)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> GeminiService<T> {
    #[must_use]
    pub fn with_transport(config: LlmConfig, transport: T) -> Self {
        let url = endpoint_url(config.base_url.as_deref(), config.model);
        Self {
            transport,
            config,
            url,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn interpret(reply: HttpReply) -> Result<String, LlmError> {
        if !reply.is_success() {
            return Err(LlmError::ProviderHttp {
                status: reply.status,
                body: reply.body,
            });
        }

        match serde_json::from_str::<Value>(&reply.body) {
            Ok(payload) => extract_text(&payload),
            Err(e) => {
                tracing::debug!(error = %e, "Gemini success body is not JSON");
                Err(LlmError::malformed(Value::String(reply.body)))
            }
        }
    }
}

#[async_trait]
impl<T: HttpTransport> LlmService for GeminiService<T> {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, LlmError> {
        // Checked before building anything so a missing key never hits the network
        let api_key = self.config.resolve_api_key(request.session_key)?;

        let body = GeminiRequest {
            contents: build_contents(request.turns, request.system_prompt),
        };

        tracing::debug!(
            model = self.model_id(),
            entries = body.contents.len(),
            has_system_prompt = request.system_prompt.is_some(),
            "Sending generateContent request"
        );

        let reply = self.transport.post_json(&self.url, &api_key, &body).await?;

        if !reply.is_success() {
            tracing::warn!(status = reply.status, "Gemini returned error status");
        }

        Self::interpret(reply)
    }

    fn model_id(&self) -> &str {
        self.config.model.api_name()
    }
}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeminiContent {
    pub role: WireRole,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: WireRole, text: &str) -> Self {
        Self {
            role,
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Roles accepted by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => WireRole::User,
            Role::Assistant => WireRole::Model,
        }
    }
}
