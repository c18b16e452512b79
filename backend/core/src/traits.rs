use anyhow::Result;
use async_trait::async_trait;

use crate::prompt::PromptTemplate;
use crate::types::{ImagePayload, OutputMode};

/// One single-shot request to a hosted multimodal model: an instruction plus
/// one inline image.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub mode: OutputMode,
    pub prompt: &'static str,
    pub image: ImagePayload,
}

impl RecognitionRequest {
    pub fn new(image: ImagePayload, mode: OutputMode) -> Self {
        Self {
            mode,
            prompt: PromptTemplate::for_mode(mode).text,
            image,
        }
    }
}

/// Trait for hosted recognition backends (Gemini, OpenAI-compatible, mock).
///
/// Implementations are stateless from the service's point of view: every call
/// is an independent generate request, never a conversation turn.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send the request and return the raw text body of the response.
    ///
    /// Failures should carry a [`crate::ProviderError`] where the cause is
    /// known so callers can classify them.
    async fn generate(&self, request: &RecognitionRequest) -> Result<String>;
}
