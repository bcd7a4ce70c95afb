#![allow(dead_code)]

use async_trait::async_trait;
use bookguide::services::llm::{CompletionRequest, LLMError, LanguageModel};
use std::sync::Mutex;

/// Records every request and answers according to `respond`.
pub struct RecordingModel {
    requests: Mutex<Vec<CompletionRequest>>,
    respond: Box<dyn Fn(&CompletionRequest) -> Result<String, LLMError> + Send + Sync>,
}

impl RecordingModel {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, LLMError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn answering(text: &'static str) -> Self {
        Self::new(move |_| Ok(text.to_string()))
    }

    /// Requests seen so far, ordered by their last message so concurrent
    /// calls compare stably.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort_by(|a, b| {
            let key = |r: &CompletionRequest| r.messages.last().map(|m| m.content.clone());
            key(a).cmp(&key(b))
        });
        requests
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LLMError> {
        let result = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);
        result
    }
}

pub fn is_quiz_request(request: &CompletionRequest) -> bool {
    request
        .messages
        .iter()
        .any(|m| m.content.contains("multiple-choice"))
}
