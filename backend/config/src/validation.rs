//! Config validation: schema checks with user-friendly error messages.

use crate::schema::TextliftConfig;
use textlift_core::OutputMode;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TextliftConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_provider(config, &mut report);
    validate_recognition(config, &mut report);
    validate_gateway(config, &mut report);
    report
}

fn validate_provider(config: &TextliftConfig, report: &mut ValidationReport) {
    let kind = config.provider_kind();
    let hosted = match kind.to_ascii_lowercase().as_str() {
        "gemini" | "google" | "openai" => true,
        "mock" => false,
        other => {
            report.error(
                "provider.kind",
                format!("Unknown provider '{other}'. Use 'gemini', 'openai', or 'mock'"),
            );
            return;
        }
    };

    if hosted && config.api_key().is_none() {
        report.error(
            "provider.apiKey",
            format!("An API key is required for the '{kind}' provider (set provider.apiKey or TEXTLIFT_API_KEY)"),
        );
    }
    if !hosted {
        report.warn("provider.kind", "Mock provider configured; responses are canned");
    }

    let Some(provider) = &config.provider else { return };
    if provider.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
        report.error("provider.model", "Model cannot be empty; omit it to use the provider default");
    }
    if provider.timeout_secs == Some(0) {
        report.error("provider.timeoutSecs", "timeoutSecs must be > 0; omit it to disable the timeout");
    }
    if let Some(url) = &provider.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("provider.baseUrl", format!("'{url}' is not an http(s) URL"));
        }
    }
}

fn validate_recognition(config: &TextliftConfig, report: &mut ValidationReport) {
    if let Err(e) = config.default_mode().parse::<OutputMode>() {
        report.error("recognition.defaultMode", e);
    }
}

fn validate_gateway(config: &TextliftConfig, report: &mut ValidationReport) {
    let port = config.port();
    if port < 1024 && port != 80 && port != 443 {
        report.warn(
            "gateway.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        );
    }
    if config.max_body_bytes() == 0 {
        report.error("gateway.maxBodyBytes", "maxBodyBytes must be > 0");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GatewayConfig, ProviderConfig, RecognitionConfig};

    fn with_provider(kind: &str, key: Option<&str>) -> TextliftConfig {
        TextliftConfig {
            provider: Some(ProviderConfig {
                kind: Some(kind.to_string()),
                api_key: key.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn gemini_with_key_is_valid() {
        let report = validate(&with_provider("gemini", Some("AIza-test")));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn missing_key_is_error() {
        let report = validate(&TextliftConfig::default());
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "provider.apiKey");
    }

    #[test]
    fn mock_needs_no_key_but_warns() {
        let report = validate(&with_provider("mock", None));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn unknown_provider_and_mode_are_errors() {
        let mut cfg = with_provider("claude", Some("k"));
        cfg.recognition = Some(RecognitionConfig {
            default_mode: Some("yaml".into()),
            ..Default::default()
        });
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["provider.kind", "recognition.defaultMode"]);
    }

    #[test]
    fn zero_body_limit_and_low_port() {
        let mut cfg = with_provider("mock", None);
        cfg.gateway = Some(GatewayConfig {
            port: Some(81),
            max_body_bytes: Some(0),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "gateway.maxBodyBytes"));
        assert!(report.warnings.iter().any(|e| e.path == "gateway.port"));
    }
}
