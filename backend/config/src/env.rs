//! Environment variable handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` escapes to a
//!   literal `${VAR}`.
//! - Well-known `TEXTLIFT_*` variables that override file values outright.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{GatewayConfig, LoggingConfig, ProviderConfig, TextliftConfig};

/// `${VAR}` with an optional leading `$` marking an escape.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_API_KEY: &str = "TEXTLIFT_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PROVIDER: &str = "TEXTLIFT_PROVIDER";
pub const ENV_MODEL: &str = "TEXTLIFT_MODEL";
pub const ENV_BIND: &str = "TEXTLIFT_BIND";
pub const ENV_PORT: &str = "TEXTLIFT_PORT";
pub const ENV_LOG_LEVEL: &str = "TEXTLIFT_LOG_LEVEL";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree using the
/// process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Config paths whose `${VAR}` references may be unset. A credential can
/// still arrive through `TEXTLIFT_API_KEY`, and validation reports it when
/// nothing supplies one.
pub const OPTIONAL_REF_PATHS: &[&str] = &["provider.apiKey"];

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "", &[])?)
}

/// Like [`resolve_env_vars_with`], but a missing reference at one of
/// `optional_paths` clears that value instead of failing.
pub fn resolve_env_vars_lenient(
    value: &Value,
    env: &HashMap<String, String>,
    optional_paths: &[&str],
) -> Result<Value> {
    Ok(substitute_value(value, env, "", optional_paths)?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
    optional_paths: &[&str],
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => match substitute_string(s, env, path) {
            Ok(resolved) => Ok(Value::String(resolved)),
            Err(e) if optional_paths.contains(&path) => {
                tracing::warn!(path, var = %e.var_name, "Referenced env var is not set; treating value as unset");
                Ok(Value::Null)
            }
            Err(e) => Err(e),
        },
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]"), optional_paths))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path, optional_paths)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_REF_PATTERN.captures_iter(s) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&s[last..whole.start()]);
        let name = &caps[2];
        if caps.get(1).is_some() {
            out.push_str(&format!("${{{name}}}"));
        } else {
            match env.get(name) {
                Some(val) if !val.is_empty() => out.push_str(val),
                _ => {
                    return Err(MissingEnvVarError {
                        var_name: name.to_string(),
                        config_path: path.to_string(),
                    })
                }
            }
        }
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_REF_PATTERN.captures_iter(s) {
                if caps.get(1).is_none() {
                    out.push(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

/// Apply `TEXTLIFT_*` overrides on top of file values.
///
/// `TEXTLIFT_API_KEY` always wins; `GEMINI_API_KEY` / `OPENAI_API_KEY` only
/// fill a key the file left empty, and only for the matching provider.
pub fn apply_env_overrides(mut config: TextliftConfig, env: &HashMap<String, String>) -> TextliftConfig {
    let get = |name: &str| lookup(env, name);

    {
        let provider = config.provider.get_or_insert_with(ProviderConfig::default);
        if let Some(kind) = get(ENV_PROVIDER) {
            provider.kind = Some(kind.to_string());
        }
        if let Some(model) = get(ENV_MODEL) {
            provider.model = Some(model.to_string());
        }
        if let Some(key) = get(ENV_API_KEY) {
            provider.api_key = Some(key.to_string());
        } else if provider.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            let fallback = match provider.kind.as_deref().unwrap_or(crate::defaults::DEFAULT_PROVIDER) {
                "gemini" | "google" => get(ENV_GEMINI_API_KEY),
                "openai" => get(ENV_OPENAI_API_KEY),
                _ => None,
            };
            if let Some(key) = fallback {
                provider.api_key = Some(key.to_string());
            }
        }
    }

    if let Some(bind) = get(ENV_BIND) {
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind.to_string());
    }
    match get(ENV_PORT).map(str::parse::<u16>) {
        Some(Ok(port)) => {
            config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
        }
        Some(Err(e)) => tracing::warn!(error = %e, "Ignoring invalid {ENV_PORT}"),
        None => {}
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }

    config
}

fn lookup<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"provider": {"apiKey": "${GEMINI_KEY}"}});
        let result = resolve_env_vars_with(&v, &env(&[("GEMINI_KEY", "AIza-abc")])).unwrap();
        assert_eq!(result["provider"]["apiKey"], "AIza-abc");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"provider": {"apiKey": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("MISSING_VAR"));
        assert!(err.to_string().contains("provider.apiKey"));
    }

    #[test]
    fn unset_key_reference_clears_only_optional_paths() {
        let v = json!({
            "provider": {"kind": "gemini", "apiKey": "${GEMINI_API_KEY}"},
            "gateway": {"bind": "${BIND_ADDR}"}
        });
        let err = resolve_env_vars_lenient(&v, &HashMap::new(), OPTIONAL_REF_PATHS).unwrap_err();
        assert!(err.to_string().contains("gateway.bind"));

        let result =
            resolve_env_vars_lenient(&v, &env(&[("BIND_ADDR", "0.0.0.0")]), OPTIONAL_REF_PATHS).unwrap();
        assert_eq!(result["provider"]["apiKey"], Value::Null);
        assert_eq!(result["provider"]["kind"], "gemini");
        assert_eq!(result["gateway"]["bind"], "0.0.0.0");
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "cost $${DOLLARS} and ${NAME}"});
        let result = resolve_env_vars_with(&v, &env(&[("NAME", "x")])).unwrap();
        assert_eq!(result["note"], "cost ${DOLLARS} and x");
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-$tring", "n": 3});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn collects_referenced_vars() {
        let v = json!({"a": "${FOO}", "b": ["${BAR}", "$${SKIP}"]});
        assert_eq!(collect_referenced_vars(&v), vec!["BAR".to_string(), "FOO".to_string()]);
    }

    #[test]
    fn textlift_key_overrides_file() {
        let mut cfg = TextliftConfig::default();
        cfg.provider = Some(ProviderConfig {
            api_key: Some("from-file".into()),
            ..Default::default()
        });
        let cfg = apply_env_overrides(cfg, &env(&[(ENV_API_KEY, "from-env"), (ENV_PORT, "9000")]));
        assert_eq!(cfg.api_key(), Some("from-env"));
        assert_eq!(cfg.port(), 9000);
    }

    #[test]
    fn provider_specific_key_fills_gaps_only() {
        let cfg = apply_env_overrides(
            TextliftConfig::default(),
            &env(&[(ENV_GEMINI_API_KEY, "g-key"), (ENV_OPENAI_API_KEY, "o-key")]),
        );
        assert_eq!(cfg.api_key(), Some("g-key"));

        let cfg = apply_env_overrides(
            TextliftConfig::default(),
            &env(&[(ENV_PROVIDER, "openai"), (ENV_GEMINI_API_KEY, "g-key")]),
        );
        assert_eq!(cfg.provider_kind(), "openai");
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let cfg = apply_env_overrides(TextliftConfig::default(), &env(&[(ENV_PORT, "http")]));
        assert_eq!(cfg.gateway, None);
    }
}
