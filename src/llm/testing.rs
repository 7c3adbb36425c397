//! Mock implementations for testing
//!
//! These mocks let the client and session logic run without real I/O.

use super::gemini::{GeminiRequest, HttpReply, HttpTransport};
use super::{GenerateRequest, LlmError, LlmService};
use crate::conversation::Turn;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock HTTP transport
// ============================================================================

/// One POST seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub api_key: String,
    pub body: Value,
}

/// Transport that returns queued replies and records every call
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, status: u16, body: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(HttpReply {
            status,
            body: body.into(),
        }));
    }

    pub fn queue_json(&self, status: u16, body: &Value) {
        self.queue_reply(status, body.to_string());
    }

    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<HttpReply, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            api_key: api_key.to_string(),
            body: serde_json::to_value(body).unwrap(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock reply queued")))
    }
}

// ============================================================================
// Mock LLM service
// ============================================================================

/// Owned copy of a [`GenerateRequest`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub turns: Vec<Turn>,
    pub system_prompt: Option<String>,
    pub session_key: Option<String>,
}

/// LLM service that returns queued results
pub struct MockLlmService {
    results: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            turns: request.turns.to_vec(),
            system_prompt: request.system_prompt.map(str::to_string),
            session_key: request.session_key.map(str::to_string),
        });
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}
