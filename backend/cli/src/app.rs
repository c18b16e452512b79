//! Wiring from resolved configuration to runtime components.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use textlift_config::TextliftConfig;
use textlift_core::OutputMode;
use textlift_logging::LogOptions;
use textlift_understanding::{build_provider, ProviderSettings, RecognitionClient, RecognitionOptions};
use tracing::info;

pub fn log_options(config: &TextliftConfig, verbose: bool) -> LogOptions {
    let logging = config.logging.clone().unwrap_or_default();
    LogOptions {
        level: if verbose {
            "debug".to_string()
        } else {
            config.log_level().to_string()
        },
        dir: logging.dir.map(PathBuf::from),
        json: logging.json.unwrap_or(false),
    }
}

pub fn provider_settings(config: &TextliftConfig) -> Result<ProviderSettings> {
    Ok(ProviderSettings {
        kind: config.provider_kind().parse()?,
        api_key: config.api_key().map(str::to_string),
        model: config.model().map(str::to_string),
        base_url: config.provider.as_ref().and_then(|p| p.base_url.clone()),
        timeout: config.timeout(),
    })
}

pub fn default_mode(config: &TextliftConfig) -> Result<OutputMode> {
    config
        .default_mode()
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Invalid recognition.defaultMode")
}

/// Build a recognition client from a config that must pass validation.
pub fn build_client(config: &TextliftConfig) -> Result<Arc<RecognitionClient>> {
    textlift_config::ensure_valid(config)?;
    let provider = build_provider(&provider_settings(config)?)?;
    let client = RecognitionClient::new(provider).with_options(RecognitionOptions {
        strict_json: config.strict_json(),
    });
    info!(provider = %client.provider_name(), model = %client.model(), "Recognition client ready");
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textlift_config::{apply_all_defaults, ProviderConfig, RecognitionConfig};
    use textlift_understanding::ProviderKind;

    fn mock_config() -> TextliftConfig {
        apply_all_defaults(TextliftConfig {
            provider: Some(ProviderConfig {
                kind: Some("mock".into()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn maps_provider_section() {
        let config = TextliftConfig {
            provider: Some(ProviderConfig {
                kind: Some("openai".into()),
                api_key: Some("sk-test".into()),
                model: Some("gpt-4o-mini".into()),
                timeout_secs: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = provider_settings(&config).unwrap();
        assert_eq!(settings.kind, ProviderKind::OpenAi);
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(settings.timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn mock_client_builds_without_key() {
        let client = build_client(&mock_config()).unwrap();
        assert_eq!(client.model(), "mock");
    }

    #[test]
    fn invalid_config_refuses_client() {
        let Err(err) = build_client(&apply_all_defaults(TextliftConfig::default())) else {
            panic!("client built without an API key");
        };
        assert!(err.to_string().contains("provider.apiKey"));
    }

    #[test]
    fn default_mode_from_config() {
        let mut config = mock_config();
        config.recognition = Some(RecognitionConfig {
            default_mode: Some("json".into()),
            ..Default::default()
        });
        assert_eq!(default_mode(&config).unwrap(), OutputMode::Json);
    }

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(log_options(&mock_config(), true).level, "debug");
        assert_eq!(log_options(&mock_config(), false).level, "info");
    }
}
