//! Process-wide configuration for the generation client

use super::gemini::GeminiModel;
use super::LlmError;

/// Environment variable holding the fallback API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Configuration read once at startup and handed to the client
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Fallback key used when the session does not supply one
    pub google_api_key: Option<String>,
    pub model: GeminiModel,
    /// Override for the endpoint host (e.g. a gateway or a local stub)
    pub base_url: Option<String>,
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let model = match std::env::var("GEMINI_MODEL") {
            Ok(name) => GeminiModel::from_api_name(name.trim()).unwrap_or_else(|| {
                tracing::warn!(
                    requested = %name,
                    fallback = GeminiModel::default().api_name(),
                    "Unknown GEMINI_MODEL, using default"
                );
                GeminiModel::default()
            }),
            Err(_) => GeminiModel::default(),
        };

        Self {
            google_api_key: std::env::var(API_KEY_ENV).ok(),
            model,
            base_url: std::env::var("GEMINI_BASE_URL").ok(),
        }
    }

    #[must_use]
    pub fn has_env_key(&self) -> bool {
        self.google_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Pick the key for one request.
    ///
    /// A non-empty session key wins and is trimmed; a session key that is
    /// only whitespace does not fall through to the environment key.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] when no usable key exists.
    pub fn resolve_api_key(&self, session_key: Option<&str>) -> Result<String, LlmError> {
        if let Some(key) = session_key.filter(|k| !k.is_empty()) {
            let key = key.trim();
            if key.is_empty() {
                return Err(LlmError::MissingCredential);
            }
            return Ok(key.to_string());
        }

        self.google_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(LlmError::MissingCredential)
    }
}
