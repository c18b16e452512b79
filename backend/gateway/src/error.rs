//! Mapping of acquisition and recognition failures to HTTP responses.
//!
//! Callers only ever see a short user-facing message; the cause is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use textlift_core::RecognizeError;
use textlift_media::MediaError;
use tracing::{error, warn};

pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image first";
pub const RECOGNITION_FAILED_MESSAGE: &str = "Error processing image. Please try again.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The recognition service is temporarily unavailable. Please try again.";

#[derive(Debug)]
pub enum ApiError {
    MissingImage,
    UnsupportedMedia(String),
    BadRequest(String),
    Recognition { transient: bool },
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Recognition { transient: true } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Recognition { transient: false } => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MissingImage => MISSING_IMAGE_MESSAGE.to_string(),
            ApiError::UnsupportedMedia(mime) => {
                format!("Unsupported file type '{mime}'. Please upload an image.")
            }
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Recognition { transient: true } => UNAVAILABLE_MESSAGE.to_string(),
            ApiError::Recognition { transient: false } | ApiError::Internal => {
                RECOGNITION_FAILED_MESSAGE.to_string()
            }
        }
    }
}

impl From<RecognizeError> for ApiError {
    fn from(err: RecognizeError) -> Self {
        match err {
            RecognizeError::AcquisitionMissing => ApiError::MissingImage,
            failed => {
                error!(error = %failed, "Recognition request failed");
                ApiError::Recognition {
                    transient: failed.is_transient(),
                }
            }
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Recognize(inner) => inner.into(),
            MediaError::UnsupportedMedia(mime) => {
                warn!(mime = %mime, "Rejected non-image upload");
                ApiError::UnsupportedMedia(mime)
            }
            MediaError::NotBase64 => {
                ApiError::BadRequest("Image data must be base64-encoded.".to_string())
            }
            MediaError::Io { .. } => {
                error!(error = %err, "Image acquisition failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
