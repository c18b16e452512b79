//! Telemetry and structured logging for TextLift.
//!
//! Handles subscriber setup (console + rolling NDJSON file), secret/blob
//! redaction, and the recognition event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, RecognitionEvent, RecognitionEventLogger};
pub use logger::{init_logger, LogOptions};
pub use redact::{preview, redact_secrets, redact_sensitive_data};
