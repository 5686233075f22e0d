//! Mock implementations for testing
//!
//! These mocks enable end-to-end dialogue tests without real I/O.

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::transport::{ChatId, TextFormat, Transport, TransportError, Update};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a successful plain-text response
    pub fn queue_text(&self, text: impl Into<String>) {
        self.queue_response(LlmResponse::from_text(text));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

/// Outbound message captured by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub format: TextFormat,
}

/// Mock transport that replays queued update batches and records replies
pub struct MockTransport {
    batches: Mutex<VecDeque<Result<Vec<Update>, TransportError>>>,
    sent: Mutex<Vec<SentMessage>>,
    fail_sends: AtomicBool,
    /// Cancelled once every queued batch has been delivered
    drained: Mutex<Option<CancellationToken>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            drained: Mutex::new(None),
        }
    }

    pub fn queue_updates(&self, updates: Vec<Update>) {
        self.batches.lock().unwrap().push_back(Ok(updates));
    }

    pub fn queue_poll_error(&self, error: TransportError) {
        self.batches.lock().unwrap().push_back(Err(error));
    }

    /// Cancel `token` when the last queued batch has been handed out
    pub fn cancel_when_drained(&self, token: CancellationToken) {
        *self.drained.lock().unwrap() = Some(token);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }

    pub fn sent_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn poll_updates(&self) -> Result<Vec<Update>, TransportError> {
        let next = self.batches.lock().unwrap().pop_front();
        if let Some(batch) = next {
            return batch;
        }

        let drained = self.drained.lock().unwrap().clone();
        if let Some(token) = drained {
            token.cancel();
        }
        std::future::pending().await
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Network("mock send failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            format,
        });
        Ok(())
    }
}
