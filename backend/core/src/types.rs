use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecognizeError;

/// Mime type assumed when the acquisition layer could not tell.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// A base64-encoded image ready to be sent inline to the recognition service.
///
/// Immutable once built; constructors refuse empty payloads so a value of this
/// type always carries image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: String,
    mime_type: String,
}

impl ImagePayload {
    /// Wrap an already base64-encoded payload.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Result<Self, RecognizeError> {
        let data = data.into().trim().to_string();
        if data.is_empty() {
            return Err(RecognizeError::AcquisitionMissing);
        }
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        let mime_type = if mime_type.is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type
        };
        Ok(Self { data, mime_type })
    }

    /// Encode raw image bytes (standard alphabet, padded).
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Result<Self, RecognizeError> {
        if bytes.is_empty() {
            return Err(RecognizeError::AcquisitionMissing);
        }
        Self::new(STANDARD.encode(bytes), mime_type)
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Approximate decoded size, for logging.
    pub fn approx_size_bytes(&self) -> usize {
        self.data.len() / 4 * 3
    }

    /// Render back into `data:<mime>;base64,<payload>` form.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Target shape of the recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

impl OutputMode {
    pub const ALL: [OutputMode; 2] = [OutputMode::Text, OutputMode::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Text => "text",
            OutputMode::Json => "json",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            other => Err(format!("unknown output mode '{other}' (expected 'text' or 'json')")),
        }
    }
}

/// Outcome of one successful recognition call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub request_id: Uuid,
    /// Monotonic per-client sequence; callers sharing one display slot keep
    /// the result with the highest sequence.
    pub sequence: u64,
    pub mode: OutputMode,
    pub text: String,
    /// Parsed document when `mode` is json and the cleaned text is valid JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Bookkeeping marker recorded after each successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub created_at: DateTime<Utc>,
    pub session_id: String,
}

/// Report returned by a session reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReset {
    pub had_active_session: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SessionReset {
    pub fn new(had_active_session: bool) -> Self {
        let message = if had_active_session {
            "Recognition session has been reset successfully."
        } else {
            "No active session to reset."
        };
        Self {
            had_active_session,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_missing_acquisition() {
        assert!(matches!(
            ImagePayload::new("   ", "image/png"),
            Err(RecognizeError::AcquisitionMissing)
        ));
        assert!(matches!(
            ImagePayload::from_bytes(&[], "image/png"),
            Err(RecognizeError::AcquisitionMissing)
        ));
    }

    #[test]
    fn blank_mime_falls_back_to_jpeg() {
        let payload = ImagePayload::new("aGVsbG8=", "").unwrap();
        assert_eq!(payload.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn from_bytes_encodes_standard_base64() {
        let payload = ImagePayload::from_bytes(b"hello", "IMAGE/PNG").unwrap();
        assert_eq!(payload.data(), "aGVsbG8=");
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn output_mode_parsing() {
        assert_eq!("JSON".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert_eq!(" text ".parse::<OutputMode>().unwrap(), OutputMode::Text);
        assert!("yaml".parse::<OutputMode>().is_err());
        assert_eq!(OutputMode::default(), OutputMode::Text);
        assert_eq!(serde_json::to_string(&OutputMode::Json).unwrap(), "\"json\"");
    }

    #[test]
    fn reset_messages() {
        assert!(SessionReset::new(true).message.contains("reset successfully"));
        assert_eq!(SessionReset::new(false).message, "No active session to reset.");
    }
}
