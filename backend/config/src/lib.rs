//! `textlift-config` — TextLift runtime configuration management.
//!
//! Provides:
//! - Typed config schema (provider, recognition, gateway, logging)
//! - YAML read/write with atomic backup
//! - `${ENV_VAR}` substitution and `TEXTLIFT_*` overrides
//! - Config redaction for safe display
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{GatewayConfig, LoggingConfig, ProviderConfig, RecognitionConfig, TextliftConfig};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use env::{
    apply_env_overrides, collect_referenced_vars, resolve_env_vars, resolve_env_vars_lenient,
    resolve_env_vars_with, MissingEnvVarError, OPTIONAL_REF_PATHS,
};
pub use redact::{collect_redacted_paths, redact};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, apply env substitution, env overrides and defaults.
///
/// This is the main entry point for loading a config at runtime. Validation
/// problems are logged but not fatal; see [`ensure_valid`].
pub async fn load_and_prepare(path: &Path) -> Result<TextliftConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// [`load_and_prepare`] against an explicit environment map.
pub async fn load_and_prepare_with(path: &Path, env: &HashMap<String, String>) -> Result<TextliftConfig> {
    let raw_config = load_config(path).await?;

    // Serialize to Value for the env substitution pass.
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_lenient(&value, env, OPTIONAL_REF_PATHS)
        .context("Failed to resolve env vars in config")?;

    let config: TextliftConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(apply_env_overrides(config, env));

    log_report(&validate(&config));
    Ok(config)
}

/// Emit every validation warning and error through `tracing`.
///
/// Callers that install the subscriber after loading call this again so the
/// report reaches the configured sinks.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// Fail with every validation error joined into one message.
pub fn ensure_valid(config: &TextliftConfig) -> Result<()> {
    let report = validate(config);
    if report.is_valid() {
        return Ok(());
    }
    let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration:\n  {}", details.join("\n  "))
}
