//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{GatewayConfig, LoggingConfig, ProviderConfig, RecognitionConfig, TextliftConfig};

/// Default recognition backend.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Largest accepted request body (20 MiB, room for a base64 photo).
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TextliftConfig) -> TextliftConfig {
    let config = apply_provider_defaults(config);
    let config = apply_recognition_defaults(config);
    let config = apply_gateway_defaults(config);
    apply_logging_defaults(config)
}

/// Ensure a provider kind is set. The model is left to the provider.
fn apply_provider_defaults(mut config: TextliftConfig) -> TextliftConfig {
    let provider = config.provider.get_or_insert_with(ProviderConfig::default);
    if provider.kind.is_none() {
        provider.kind = Some(DEFAULT_PROVIDER.to_string());
    }
    config
}

fn apply_recognition_defaults(mut config: TextliftConfig) -> TextliftConfig {
    let recognition = config.recognition.get_or_insert_with(RecognitionConfig::default);
    if recognition.default_mode.is_none() {
        recognition.default_mode = Some("text".to_string());
    }
    if recognition.strict_json.is_none() {
        recognition.strict_json = Some(false);
    }
    config
}

fn apply_gateway_defaults(mut config: TextliftConfig) -> TextliftConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    if gateway.bind.is_none() {
        gateway.bind = Some(DEFAULT_BIND.to_string());
    }
    if gateway.port.is_none() {
        gateway.port = Some(DEFAULT_PORT);
    }
    if gateway.max_body_bytes.is_none() {
        gateway.max_body_bytes = Some(DEFAULT_MAX_BODY_BYTES);
    }
    config
}

fn apply_logging_defaults(mut config: TextliftConfig) -> TextliftConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}
