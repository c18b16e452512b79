//! Recognition Event Logger
//!
//! Structured events (requested, completed, failed, session reset) emitted
//! through `tracing` under the `recognition_events` target, so the JSON file
//! layer produces one NDJSON line per event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::{redact_secrets, redact_sensitive_data};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    Requested {
        request_id: String,
        sequence: u64,
        provider: String,
        mode: String,
        mime_type: String,
        approx_bytes: usize,
    },
    Completed {
        request_id: String,
        sequence: u64,
        latency_ms: u64,
        chars: usize,
        preview: String,
    },
    Failed {
        request_id: String,
        error_msg: String,
    },
    SessionReset {
        had_active_session: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub event: RecognitionEvent,
}

pub struct RecognitionEventLogger;

impl RecognitionEventLogger {
    /// Redacts free-text fields, then emits the event. Returns the logged entry.
    pub fn log_event(session_id: Option<&str>, mut event: RecognitionEvent) -> EventLogEntry {
        match &mut event {
            RecognitionEvent::Completed { preview, .. } => {
                *preview = redact_secrets(preview);
            }
            RecognitionEvent::Failed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            RecognitionEvent::Requested { .. } | RecognitionEvent::SessionReset { .. } => {}
        }

        let entry = EventLogEntry {
            session_id: session_id.map(str::to_string),
            timestamp: Utc::now(),
            event,
        };

        let line = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "recognition_events", event = %line, "Recognition event");
        entry
    }
}
