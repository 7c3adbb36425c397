//! LLM error types

use thiserror::Error;

/// Shown when neither the session nor the environment supplies an API key.
pub const MISSING_KEY_MESSAGE: &str = "API 키가 설정되지 않았습니다. 사이드바에서 입력하거나 .env 파일을 업데이트하세요. \
(No API key configured. Enter one for this session or set GOOGLE_API_KEY in the .env file.)";

/// Failure of a single generation attempt.
///
/// Every variant is terminal for the current turn; nothing is retried.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No key available; the user has to supply one
    #[error("{}", MISSING_KEY_MESSAGE)]
    MissingCredential,

    /// Endpoint answered with a non-success status
    #[error("Gemini API error: {status} {body}")]
    ProviderHttp { status: u16, body: String },

    /// Success status, but no usable text in the payload
    #[error("Unexpected Gemini payload: {payload}")]
    MalformedResponse { payload: serde_json::Value },

    /// Connection failure, timeout, or unreadable body
    #[error("Request failed: {0}")]
    Network(String),
}

impl LlmError {
    #[must_use]
    pub fn kind(&self) -> LlmErrorKind {
        match self {
            Self::MissingCredential => LlmErrorKind::MissingCredential,
            Self::ProviderHttp { .. } => LlmErrorKind::ProviderHttp,
            Self::MalformedResponse { .. } => LlmErrorKind::MalformedResponse,
            Self::Network(_) => LlmErrorKind::Network,
        }
    }

    #[must_use]
    pub fn malformed(payload: serde_json::Value) -> Self {
        Self::MalformedResponse { payload }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

/// Error classification, used for logging and matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    MissingCredential,
    ProviderHttp,
    MalformedResponse,
    Network,
}

impl LlmErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::ProviderHttp => "provider_http",
            Self::MalformedResponse => "malformed_response",
            Self::Network => "network",
        }
    }

    /// Whether the user can fix this without changing anything server side
    #[must_use]
    pub fn is_user_correctable(self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}
