//! Scripted transport for exercising the executor and fallback chain
//! without network access.

use super::{ChatTransport, RequestKind, StagedRequest};
use crate::executor::ChatRequest;
use crate::routing::Strategy;
use crate::utils::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Body(String),
    Fail(String),
    /// Never completes; the caller's deadline or cancellation ends the call
    Hang,
}

/// What the transport observed while a call was in flight.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: RequestKind,
    pub request: ChatRequest,
    pub scratch_dir: PathBuf,
    pub staged_files: Vec<String>,
    pub api_key: String,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    outcomes: Arc<Mutex<HashMap<RequestKind, VecDeque<MockOutcome>>>>,
    default_outcome: Arc<Mutex<Option<MockOutcome>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, strategy: Strategy, outcome: MockOutcome) -> Self {
        self.with_kind_outcome(RequestKind::Video(strategy), outcome)
    }

    pub fn with_kind_outcome(self, kind: RequestKind, outcome: MockOutcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(outcome);
        self
    }

    pub fn with_default(self, outcome: MockOutcome) -> Self {
        *self.default_outcome.lock().unwrap() = Some(outcome);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn strategies_called(&self) -> Vec<Strategy> {
        self.calls()
            .iter()
            .filter_map(|c| match c.kind {
                RequestKind::Video(strategy) => Some(strategy),
                RequestKind::Image | RequestKind::Text => None,
            })
            .collect()
    }

    fn next_outcome(&self, kind: RequestKind) -> MockOutcome {
        let scripted = self
            .outcomes
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(|queue| queue.pop_front());

        scripted
            .or_else(|| self.default_outcome.lock().unwrap().clone())
            .unwrap_or_else(|| MockOutcome::Body(success_body("mock analysis")))
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, request: &StagedRequest) -> Result<String> {
        let document = std::fs::read_to_string(&request.document)?;
        let parsed: ChatRequest = serde_json::from_str(&document)?;

        let scratch_dir = request
            .document
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let mut staged_files: Vec<String> = std::fs::read_dir(&scratch_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        staged_files.sort();

        self.calls.lock().unwrap().push(RecordedCall {
            kind: request.kind,
            request: parsed,
            scratch_dir,
            staged_files,
            api_key: request.api_key.clone(),
        });

        match self.next_outcome(request.kind) {
            MockOutcome::Body(body) => Ok(body),
            MockOutcome::Fail(message) => Err(Error::transport(message)),
            MockOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::transport("mock hang elapsed"))
            }
        }
    }
}

/// A minimal chat-completion envelope with the given content.
pub fn success_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 1200, "completion_tokens": 34, "total_tokens": 1234}
    })
    .to_string()
}
