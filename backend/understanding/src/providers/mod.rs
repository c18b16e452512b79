pub mod gemini;
pub mod mock;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use textlift_core::{ProviderError, RecognitionProvider};

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

/// Error bodies longer than this are cut before they end up in errors/logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Which hosted backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => anyhow::bail!("unknown provider '{other}'; use 'gemini', 'openai', or 'mock'"),
        }
    }
}

/// Everything needed to construct a provider, resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Whole-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

/// Build the provider described by `settings`.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn RecognitionProvider>> {
    let provider: Arc<dyn RecognitionProvider> = match settings.kind {
        ProviderKind::Mock => Arc::new(MockProvider::new("mock")),
        ProviderKind::Gemini => {
            let mut provider = GeminiProvider::new(require_key(settings)?)
                .with_client(http_client(settings.timeout)?);
            if let Some(model) = &settings.model {
                provider = provider.with_model(model);
            }
            if let Some(url) = &settings.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
        ProviderKind::OpenAi => {
            let mut provider = OpenAiProvider::new(require_key(settings)?)
                .with_client(http_client(settings.timeout)?);
            if let Some(model) = &settings.model {
                provider = provider.with_model(model);
            }
            if let Some(url) = &settings.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
    };
    Ok(provider)
}

fn require_key(settings: &ProviderSettings) -> Result<&str> {
    settings
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .with_context(|| format!("an API key is required for the '{}' provider", settings.kind))
}

fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        message: err.to_string(),
        timeout: err.is_timeout(),
    }
}

/// Turn a non-2xx response into [`ProviderError::Status`].
pub(crate) async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kinds() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("claude".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn hosted_providers_need_a_key() {
        let settings = ProviderSettings::default();
        let err = build_provider(&settings).err().unwrap();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn builds_configured_provider() {
        let settings = ProviderSettings {
            kind: ProviderKind::Gemini,
            api_key: Some("test-key".into()),
            model: Some("gemini-1.5-pro".into()),
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let provider = build_provider(&settings).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-1.5-pro");

        let mock = build_provider(&ProviderSettings {
            kind: ProviderKind::Mock,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(mock.name(), "mock");
    }
}
