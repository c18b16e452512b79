use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use textlift_core::{ProviderError, RecognitionProvider, RecognitionRequest};

enum Canned {
    Text(String),
    Failure(String),
}

/// A deterministic provider that returns canned responses and remembers
/// every request it was given.
pub struct MockProvider {
    name: String,
    canned: Canned,
    requests: Mutex<Vec<RecognitionRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canned: Canned::Text("Mock response".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.canned = Canned::Text(response.into());
        self
    }

    /// Every call fails with a transport error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.canned = Canned::Failure(message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<RecognitionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecognitionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &RecognitionRequest) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.canned {
            Canned::Text(text) => Ok(text.clone()),
            Canned::Failure(message) => Err(ProviderError::Transport {
                message: message.clone(),
                timeout: false,
            }
            .into()),
        }
    }
}
