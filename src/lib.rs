//! Gemini chat core
//!
//! Conversation history, the English-tutor system prompt, and the client that
//! sends history to the Gemini generateContent endpoint and extracts the
//! reply text.

pub mod conversation;
pub mod llm;
pub mod session;
pub mod system_prompt;

pub use conversation::{Conversation, Role, Turn};
pub use llm::{GenerateRequest, LlmConfig, LlmError, LlmErrorKind, LlmService};
pub use session::{ChatMode, Session, SessionConfig};
