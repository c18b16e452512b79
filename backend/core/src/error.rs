use thiserror::Error;

/// Top-level error type for a recognition request.
///
/// There are exactly two outcomes a caller has to handle: no image was
/// supplied, or the hosted service could not produce a result.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("no image supplied; upload or paste an image first")]
    AcquisitionMissing,

    #[error("recognition failed ({provider}): {source}")]
    RecognitionFailed {
        provider: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RecognizeError {
    pub fn failed(provider: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::RecognitionFailed {
            provider: provider.into(),
            source: source.into(),
        }
    }

    /// Whether the underlying cause looks temporary (network trouble,
    /// throttling, upstream 5xx). Nothing retries on this; it only changes
    /// the wording surfaces show to the user.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::AcquisitionMissing => false,
            Self::RecognitionFailed { source, .. } => source
                .downcast_ref::<ProviderError>()
                .map(ProviderError::is_transient)
                .unwrap_or(false),
        }
    }
}

/// Failures reported by a [`crate::RecognitionProvider`] implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {message}")]
    Transport { message: String, timeout: bool },

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider response contained no text")]
    EmptyResponse,
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::EmptyResponse => false,
        }
    }
}
