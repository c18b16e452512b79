//! Recognition client: the request/response orchestration around a single
//! hosted-model call.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use textlift_core::{
    ImagePayload, OutputMode, RecognitionProvider, RecognitionRequest, RecognitionResult,
    RecognizeError, SessionMetadata, SessionReset, SessionTracker,
};
use textlift_logging::{preview, RecognitionEvent, RecognitionEventLogger};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::fence::{parse_json_document, strip_json_fence};

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecognitionOptions {
    /// Fail json-mode calls whose cleaned output does not parse as JSON.
    /// When false the cleaned text is returned with no parsed document.
    pub strict_json: bool,
}

/// Orchestrates one recognition call per [`RecognitionClient::recognize`]:
/// prompt selection, provider dispatch, post-processing, session bookkeeping.
///
/// Session state is owned by the client instance, so separate clients never
/// observe each other's sessions.
pub struct RecognitionClient {
    provider: Arc<dyn RecognitionProvider>,
    session: SessionTracker,
    options: RecognitionOptions,
}

impl RecognitionClient {
    pub fn new(provider: Arc<dyn RecognitionProvider>) -> Self {
        Self {
            provider,
            session: SessionTracker::new(),
            options: RecognitionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RecognitionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_session_tracker(mut self, session: SessionTracker) -> Self {
        self.session = session;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn options(&self) -> RecognitionOptions {
        self.options
    }

    pub fn session(&self) -> Option<SessionMetadata> {
        self.session.current()
    }

    /// Extract text from `image` in the requested `mode`.
    ///
    /// `None` fails with `AcquisitionMissing` without touching the network.
    /// Any provider or post-processing failure is `RecognitionFailed`, and the
    /// session marker is left as it was.
    #[instrument(skip(self, image), fields(provider = %self.provider.name()))]
    pub async fn recognize(
        &self,
        image: Option<&ImagePayload>,
        mode: OutputMode,
    ) -> Result<RecognitionResult, RecognizeError> {
        let Some(image) = image else {
            warn!("Recognition requested without an image");
            return Err(RecognizeError::AcquisitionMissing);
        };

        let sequence = self.session.next_sequence();
        let request_id = Uuid::new_v4();
        let session_id = self.session.current().map(|s| s.session_id);

        RecognitionEventLogger::log_event(
            session_id.as_deref(),
            RecognitionEvent::Requested {
                request_id: request_id.to_string(),
                sequence,
                provider: self.provider.name().to_string(),
                mode: mode.to_string(),
                mime_type: image.mime_type().to_string(),
                approx_bytes: image.approx_size_bytes(),
            },
        );

        let request = RecognitionRequest::new(image.clone(), mode);
        let start = Instant::now();

        let outcome = match self.provider.generate(&request).await {
            Ok(raw) => self.post_process(raw, mode),
            Err(source) => Err(RecognizeError::failed(self.provider.name(), source)),
        };

        let (text, json) = match outcome {
            Ok(parts) => parts,
            Err(err) => {
                error!(error = %err, %request_id, "Recognition failed");
                RecognitionEventLogger::log_event(
                    session_id.as_deref(),
                    RecognitionEvent::Failed {
                        request_id: request_id.to_string(),
                        error_msg: err.to_string(),
                    },
                );
                return Err(err);
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;

        let recorded = self.session.record(sequence);
        if recorded.is_none() {
            debug!(sequence, "A newer completion is already recorded; keeping it");
        }

        RecognitionEventLogger::log_event(
            recorded.as_ref().map(|s| s.session_id.as_str()),
            RecognitionEvent::Completed {
                request_id: request_id.to_string(),
                sequence,
                latency_ms,
                chars: text.chars().count(),
                preview: preview(&text, PREVIEW_CHARS),
            },
        );
        info!(%request_id, sequence, latency_ms, "Recognition completed");

        Ok(RecognitionResult {
            request_id,
            sequence,
            mode,
            text,
            json,
            provider: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
            latency_ms,
            completed_at: Utc::now(),
        })
    }

    /// Clear the session marker and report whether one existed.
    pub fn reset_session(&self) -> SessionReset {
        let had_active_session = self.session.reset();
        RecognitionEventLogger::log_event(None, RecognitionEvent::SessionReset { had_active_session });
        SessionReset::new(had_active_session)
    }

    fn post_process(
        &self,
        raw: String,
        mode: OutputMode,
    ) -> Result<(String, Option<serde_json::Value>), RecognizeError> {
        match mode {
            OutputMode::Text => Ok((raw, None)),
            OutputMode::Json => {
                let text = strip_json_fence(&raw).to_string();
                match parse_json_document(&text) {
                    Ok(value) => Ok((text, Some(value))),
                    Err(err) if self.options.strict_json => Err(RecognizeError::failed(
                        self.provider.name(),
                        anyhow::Error::new(err).context("model output is not valid JSON"),
                    )),
                    Err(err) => {
                        warn!(error = %err, "JSON-mode output did not parse; returning cleaned text");
                        Ok((text, None))
                    }
                }
            }
        }
    }
}
