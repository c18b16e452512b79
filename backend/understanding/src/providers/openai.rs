//! OpenAI-compatible chat completions provider.
//!
//! The image travels as a data URL inside an `image_url` content part.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use textlift_core::{ProviderError, RecognitionProvider, RecognitionRequest};

use super::{check_status, transport_error};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: OPENAI_DEFAULT_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn request_body(&self, request: &RecognitionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": request.prompt },
                    { "type": "image_url",
                      "image_url": { "url": request.image.to_data_url() } }
                ]
            }],
            "max_tokens": 4096
        })
    }
}

fn extract_content(json: &serde_json::Value) -> Result<String, ProviderError> {
    match json["choices"][0]["message"]["content"].as_str() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ProviderError::EmptyResponse),
    }
}

#[async_trait]
impl RecognitionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &RecognitionRequest) -> Result<String> {
        info!("[Vision] Recognizing image via OpenAI {}", self.model);
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp).await?;
        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(extract_content(&json)?)
    }
}
