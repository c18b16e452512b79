//! `textlift recognize`: one-shot recognition of a file, stdin or data URL.

use std::path::Path;

use anyhow::{bail, Result};
use textlift_config::TextliftConfig;
use textlift_core::{ImagePayload, OutputMode, RecognitionResult, RecognizeError};
use textlift_media::{load_image_file, parse_data_url, payload_from_bytes, MediaError};
use tokio::io::AsyncReadExt;
use tracing::error;

use crate::app;
use crate::terminal_output::write_line;

pub struct RecognizeArgs {
    pub input: String,
    pub mode: Option<OutputMode>,
    pub mime: Option<String>,
    pub json_output: bool,
}

pub async fn run(config: &TextliftConfig, args: RecognizeArgs) -> Result<()> {
    let mode = match args.mode {
        Some(mode) => mode,
        None => app::default_mode(config)?,
    };
    let client = app::build_client(config)?;
    let image = acquire(&args.input, args.mime.as_deref()).await?;

    let result = match client.recognize(image.as_ref(), mode).await {
        Ok(result) => result,
        Err(RecognizeError::AcquisitionMissing) => bail!("Please upload an image first"),
        Err(e) => {
            error!(error = %e, "Recognition failed");
            if e.is_transient() {
                bail!("The recognition service is temporarily unavailable. Please try again.");
            }
            bail!("Error processing image. Please try again.");
        }
    };

    let rendered = render(&result, args.json_output)?;
    write_line(&mut std::io::stdout().lock(), &rendered)?;
    Ok(())
}

/// Read the image named by `input`: `-` is stdin, `data:` is an inline data
/// URL, anything else is a file path. An empty source is `Ok(None)`.
pub async fn acquire(input: &str, mime: Option<&str>) -> Result<Option<ImagePayload>> {
    let acquired = if input == "-" {
        let mut bytes = Vec::new();
        tokio::io::stdin().read_to_end(&mut bytes).await?;
        payload_from_bytes(&bytes, mime)
    } else if input.starts_with("data:") {
        parse_data_url(input)
    } else if mime.is_some() {
        let path = Path::new(input);
        let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        payload_from_bytes(&bytes, mime)
    } else {
        load_image_file(Path::new(input)).await
    };

    match acquired {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if e.is_missing() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Text for stdout: the full result object, a pretty JSON document, or the
/// recognized text as returned.
pub fn render(result: &RecognitionResult, json_output: bool) -> Result<String> {
    if json_output {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    match &result.json {
        Some(doc) => Ok(serde_json::to_string_pretty(doc)?),
        None => Ok(result.text.clone()),
    }
}
