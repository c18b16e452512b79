//! `textlift config` subcommands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use textlift_config::{
    redact, validate, write_config, ProviderConfig, RecognitionConfig, TextliftConfig,
};

use crate::terminal_output::{note_success, note_warn, render_table};

/// Print the resolved config as YAML with secrets masked.
pub fn show(config: &TextliftConfig) -> Result<()> {
    print!("{}", redacted_yaml(config)?);
    Ok(())
}

fn redacted_yaml(config: &TextliftConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    serde_yaml::to_string(&redact(&value)).context("Failed to render config as YAML")
}

/// Print the validation report; fails when any error was found.
pub fn validate_cmd(config: &TextliftConfig, path: &Path) -> Result<()> {
    let report = validate(config);
    let rows: Vec<Vec<String>> = report
        .errors
        .iter()
        .map(|e| ("error", e))
        .chain(report.warnings.iter().map(|w| ("warning", w)))
        .map(|(level, e)| vec![level.to_string(), e.path.clone(), e.message.clone()])
        .collect();

    if !rows.is_empty() {
        println!("{}", render_table(&["Level", "Path", "Message"], &rows));
    }
    if !report.is_valid() {
        bail!("{} has {} error(s)", path.display(), report.errors.len());
    }
    if report.warnings.is_empty() {
        note_success(&format!("{} is valid", path.display()));
    } else {
        note_warn(&format!("{} is valid with {} warning(s)", path.display(), report.warnings.len()));
    }
    Ok(())
}

/// Starter config: Gemini with the key read from `GEMINI_API_KEY`.
pub fn starter_config() -> TextliftConfig {
    TextliftConfig {
        provider: Some(ProviderConfig {
            kind: Some("gemini".to_string()),
            api_key: Some("${GEMINI_API_KEY}".to_string()),
            ..Default::default()
        }),
        recognition: Some(RecognitionConfig {
            default_mode: Some("text".to_string()),
            strict_json: Some(false),
        }),
        ..Default::default()
    }
}

pub async fn init(path: &Path, force: bool) -> Result<()> {
    write_config(&starter_config(), path, force).await?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_key() {
        let mut config = starter_config();
        if let Some(p) = config.provider.as_mut() {
            p.api_key = Some("AIzaSyRealLookingKey0000000".into());
        }
        let yaml = redacted_yaml(&config).unwrap();
        assert!(yaml.contains("AIza***"));
        assert!(!yaml.contains("RealLooking"));
    }

    #[test]
    fn validate_reports_failure() {
        let config = TextliftConfig::default();
        let err = validate_cmd(&config, Path::new("config.yaml")).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[tokio::test]
    async fn init_writes_starter_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        init(&path, false).await.unwrap();
        let loaded = textlift_config::load_config(&path).await.unwrap();
        assert_eq!(loaded, starter_config());
        assert!(init(&path, false).await.is_err());
        init(&path, true).await.unwrap();
    }
}
