//! Commands that talk to a running `textlift serve` instance.

use anyhow::{Context, Result};
use serde_json::Value;
use textlift_config::TextliftConfig;
use textlift_core::SessionReset;

use crate::terminal_output::{note_info, note_success, note_warn, render_table};

/// Base URL of the local server: an explicit `--url` wins, otherwise the
/// configured bind address and port. Wildcard binds are reached via loopback.
pub fn server_url(config: &TextliftConfig, url: Option<&str>) -> String {
    if let Some(url) = url {
        return url.trim_end_matches('/').to_string();
    }
    let host = match config.bind() {
        "0.0.0.0" | "" => "127.0.0.1".to_string(),
        "::" => "[::1]".to_string(),
        h if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
        h => h.to_string(),
    };
    format!("http://{host}:{}", config.port())
}

/// `textlift status`: query `/api/health`.
pub async fn status(base: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let resp = match client.get(format!("{base}/api/health")).send().await {
        Ok(resp) => resp,
        Err(_) => {
            note_warn(&format!("TextLift is not running at {base}"));
            return Ok(());
        }
    };
    let body: Value = resp
        .error_for_status()?
        .json()
        .await
        .context("Health endpoint returned invalid JSON")?;

    note_success(&format!("TextLift is running at {base}"));
    println!("{}", render_table(&["Key", "Value"], &health_rows(&body)));
    Ok(())
}

fn health_rows(body: &Value) -> Vec<Vec<String>> {
    ["version", "provider", "model", "uptimeSeconds"]
        .iter()
        .filter_map(|key| {
            let value = match body.get(*key)? {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(vec![key.to_string(), value])
        })
        .collect()
}

/// `textlift reset`: clear the server's session marker.
pub async fn reset(base: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let report: SessionReset = client
        .post(format!("{base}/api/session/reset"))
        .send()
        .await
        .with_context(|| format!("TextLift is not running at {base}"))?
        .error_for_status()?
        .json()
        .await
        .context("Reset endpoint returned an unexpected body")?;

    if report.had_active_session {
        note_success(&report.message);
    } else {
        note_info(&report.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use textlift_config::GatewayConfig;

    fn with_bind(bind: &str, port: u16) -> TextliftConfig {
        TextliftConfig {
            gateway: Some(GatewayConfig {
                bind: Some(bind.into()),
                port: Some(port),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn url_from_config() {
        assert_eq!(server_url(&with_bind("0.0.0.0", 9000), None), "http://127.0.0.1:9000");
        assert_eq!(server_url(&with_bind("::", 80), None), "http://[::1]:80");
        assert_eq!(server_url(&with_bind("10.0.0.2", 8080), None), "http://10.0.0.2:8080");
        assert_eq!(
            server_url(&TextliftConfig::default(), Some("http://box:1234/")),
            "http://box:1234"
        );
    }

    #[test]
    fn health_rows_skip_missing() {
        let rows = health_rows(&json!({"status": "ok", "provider": "gemini", "uptimeSeconds": 12}));
        assert_eq!(
            rows,
            vec![
                vec!["provider".to_string(), "gemini".to_string()],
                vec!["uptimeSeconds".to_string(), "12".to_string()],
            ]
        );
    }
}
