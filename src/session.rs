//! One interactive chat session
//!
//! Owns the conversation and the per-session settings. A submission appends
//! the user turn first and keeps it whatever happens; the assistant turn is
//! appended only when generation succeeds. The next submission therefore
//! resends the unanswered turn with the rest of the history.

use crate::conversation::{Conversation, Turn};
use crate::llm::{GenerateRequest, LlmError, LlmService};
use crate::system_prompt::{build_system_prompt, Persona};

pub const CHAT_GREETING: &str = "안녕하세요! Google Gemini로 구동되는 챗봇입니다. 무엇을 도와드릴까요?";

pub const TUTOR_GREETING: &str =
    "Hi there! Let's practise English together. What would you like to talk about? (편하게 영어로 말해 보세요!)";

/// Which front-end this session behaves as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatMode {
    /// Plain assistant, history only
    #[default]
    Chat,
    /// English tutor, history prefixed with a persona/mission system prompt
    Tutor,
}

impl ChatMode {
    #[must_use]
    pub fn greeting(self) -> &'static str {
        match self {
            ChatMode::Chat => CHAT_GREETING,
            ChatMode::Tutor => TUTOR_GREETING,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "chat" => Some(ChatMode::Chat),
            "tutor" => Some(ChatMode::Tutor),
            _ => None,
        }
    }

    /// Read `CHAT_MODE`, defaulting to plain chat.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("CHAT_MODE") {
            Ok(name) => Self::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(requested = %name, "Unknown CHAT_MODE, using chat");
                ChatMode::Chat
            }),
            Err(_) => ChatMode::Chat,
        }
    }
}

/// Per-session settings; lost when the session ends
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Key typed in for this session; falls back to the environment key
    pub api_key: Option<String>,
    pub persona_label: String,
    pub mission_text: String,
    pub feedback_enabled: bool,
}

impl SessionConfig {
    /// Seed tutor settings from `TUTOR_PERSONA`, `TUTOR_MISSION` and `TUTOR_FEEDBACK`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: None,
            persona_label: std::env::var("TUTOR_PERSONA")
                .unwrap_or_else(|_| Persona::Friend.label().to_string()),
            mission_text: std::env::var("TUTOR_MISSION").unwrap_or_default(),
            feedback_enabled: std::env::var("TUTOR_FEEDBACK").is_ok_and(|v| parse_flag(&v)),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Conversation plus settings for one user
pub struct Session {
    mode: ChatMode,
    config: SessionConfig,
    conversation: Conversation,
}

impl Session {
    #[must_use]
    pub fn new(mode: ChatMode, config: SessionConfig) -> Self {
        Self {
            mode,
            config,
            conversation: Conversation::with_greeting(mode.greeting()),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Settings edits apply from the next submission on.
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// System prompt for the next request, recomposed from current settings
    #[must_use]
    pub fn system_prompt(&self) -> Option<String> {
        match self.mode {
            ChatMode::Chat => None,
            ChatMode::Tutor => Some(build_system_prompt(
                &self.config.persona_label,
                &self.config.mission_text,
                self.config.feedback_enabled,
            )),
        }
    }

    /// Record the user's message and ask the model for a reply.
    ///
    /// # Errors
    ///
    /// Any [`LlmError`] from the service. The user turn stays in the
    /// conversation; no assistant turn is added.
    pub async fn submit(
        &mut self,
        text: impl Into<String>,
        llm: &dyn LlmService,
    ) -> Result<&Turn, LlmError> {
        self.conversation.push(Turn::user(text));

        let system_prompt = self.system_prompt();
        let request = GenerateRequest {
            turns: self.conversation.turns(),
            system_prompt: system_prompt.as_deref(),
            session_key: self.config.api_key.as_deref(),
        };

        let result = llm.generate(&request).await;

        match result {
            Ok(reply) => Ok(self.conversation.push(Turn::assistant(reply))),
            Err(e) => {
                tracing::warn!(
                    kind = e.kind().as_str(),
                    turns = self.conversation.len(),
                    "Generation failed; user turn kept for the next attempt"
                );
                Err(e)
            }
        }
    }
}
