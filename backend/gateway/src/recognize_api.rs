//! Recognition endpoints.
//!
//! `POST /api/recognize` takes a pasted or uploaded image as a data URL (or
//! bare base64 plus a declared type); `POST /api/recognize/upload` takes the
//! raw file bytes as the request body.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::Deserialize;
use textlift_core::{ImagePayload, RecognitionResult};
use textlift_media::{parse_data_url, payload_from_bytes, MediaError};
use tracing::debug;

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeBody {
    /// `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub image: Option<String>,
    /// Bare base64, used when `image` is absent.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

/// Handler for `POST /api/recognize`
pub async fn recognize(
    State(state): State<GatewayState>,
    Json(body): Json<RecognizeBody>,
) -> Result<Json<RecognitionResult>, ApiError> {
    let mode = state.resolve_mode(body.mode.as_deref())?;
    let image = acquire_from_body(&body)?;
    let result = state.client.recognize(image.as_ref(), mode).await?;
    Ok(Json(result))
}

/// Handler for `POST /api/recognize/upload?mode=..`
pub async fn recognize_upload(
    State(state): State<GatewayState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecognitionResult>, ApiError> {
    let mode = state.resolve_mode(query.mode.as_deref())?;
    let declared = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    debug!(bytes = body.len(), declared = ?declared, "Received upload");

    let image = match payload_from_bytes(&body, declared) {
        Ok(payload) => Some(payload),
        Err(e) if e.is_missing() => None,
        Err(e) => return Err(e.into()),
    };
    let result = state.client.recognize(image.as_ref(), mode).await?;
    Ok(Json(result))
}

/// An absent or blank image is `Ok(None)`; the client reports it.
fn acquire_from_body(body: &RecognizeBody) -> Result<Option<ImagePayload>, MediaError> {
    let source = body
        .image
        .as_deref()
        .or(body.data.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let Some(source) = source else {
        return Ok(None);
    };

    let declared = body.mime_type.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let payload = match declared {
        Some(mime) if !source.starts_with("data:") => {
            parse_data_url(&format!("data:{mime};base64,{source}"))
        }
        _ => parse_data_url(source),
    };
    match payload {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if e.is_missing() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MISSING_IMAGE_MESSAGE, RECOGNITION_FAILED_MESSAGE};
    use crate::server::test_support::{body_json, state_with};
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use textlift_core::OutputMode;
    use textlift_understanding::{MockProvider, RecognitionClient};

    const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";
    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn body(image: Option<&str>, mode: Option<&str>) -> RecognizeBody {
        RecognizeBody {
            image: image.map(str::to_string),
            mode: mode.map(str::to_string),
            ..Default::default()
        }
    }

    async fn respond(result: Result<Json<RecognitionResult>, ApiError>) -> (StatusCode, serde_json::Value) {
        let response = match result {
            Ok(json) => json.into_response(),
            Err(err) => err.into_response(),
        };
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn data_url_text_mode() {
        let state = state_with(MockProvider::new("mock").with_response("Hello"));
        let (status, json) =
            respond(recognize(State(state), Json(body(Some(PNG_DATA_URL), None))).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["mode"], "text");
        assert_eq!(json["sequence"], 1);
        assert!(json.get("json").is_none());
    }

    #[tokio::test]
    async fn json_mode_strips_fence_and_parses() {
        let provider = Arc::new(MockProvider::new("mock").with_response("```json\n{\"a\":1}\n```"));
        let client = RecognitionClient::new(provider.clone());
        let state = GatewayState::new(Arc::new(client), OutputMode::Text, 1024);

        let (status, json) =
            respond(recognize(State(state), Json(body(Some(PNG_DATA_URL), Some("json")))).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "{\"a\":1}\n");
        assert_eq!(json["json"]["a"], 1);
        assert_eq!(provider.requests()[0].mode, OutputMode::Json);
        assert_eq!(provider.requests()[0].image.mime_type(), "image/png");
    }

    #[tokio::test]
    async fn missing_image_is_400_without_provider_call() {
        let provider = Arc::new(MockProvider::new("mock"));
        let client = RecognitionClient::new(provider.clone());
        let state = GatewayState::new(Arc::new(client), OutputMode::Text, 1024);

        let (status, json) = respond(recognize(State(state), Json(body(None, None))).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], MISSING_IMAGE_MESSAGE);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn bare_base64_with_declared_type() {
        let provider = Arc::new(MockProvider::new("mock"));
        let client = RecognitionClient::new(provider.clone());
        let state = GatewayState::new(Arc::new(client), OutputMode::Text, 1024);
        let request = RecognizeBody {
            data: Some("R0lGODlhAQABAAAAACw=".into()),
            mime_type: Some("image/gif".into()),
            ..Default::default()
        };
        let (status, _) = respond(recognize(State(state), Json(request)).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(provider.requests()[0].image.mime_type(), "image/gif");
    }

    #[tokio::test]
    async fn provider_failure_is_generic_error() {
        let state = state_with(MockProvider::new("mock").failing("connection refused"));
        let (status, json) =
            respond(recognize(State(state.clone()), Json(body(Some(PNG_DATA_URL), None))).await).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_ne!(json["error"], RECOGNITION_FAILED_MESSAGE);
        assert!(state.client.session().is_none());
    }

    #[tokio::test]
    async fn unknown_mode_is_400() {
        let state = state_with(MockProvider::new("mock"));
        let (status, json) =
            respond(recognize(State(state), Json(body(Some(PNG_DATA_URL), Some("xml")))).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("xml"));
    }

    #[tokio::test]
    async fn non_image_data_url_is_415() {
        let state = state_with(MockProvider::new("mock"));
        let (status, _) = respond(
            recognize(State(state), Json(body(Some("data:application/pdf;base64,JVBERi0="), None))).await,
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn raw_upload_sniffs_bytes() {
        let provider = Arc::new(MockProvider::new("mock").with_response("{}"));
        let client = RecognitionClient::new(provider.clone());
        let state = GatewayState::new(Arc::new(client), OutputMode::Text, 1024);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));

        let query = UploadQuery {
            mode: Some("json".into()),
        };
        let (status, json) = respond(
            recognize_upload(State(state), Query(query), headers, Bytes::from_static(PNG_BYTES)).await,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "json");
        assert_eq!(provider.requests()[0].image.mime_type(), "image/png");
    }

    #[tokio::test]
    async fn empty_upload_is_400() {
        let state = state_with(MockProvider::new("mock"));
        let (status, json) = respond(
            recognize_upload(State(state), Query(UploadQuery::default()), HeaderMap::new(), Bytes::new()).await,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], MISSING_IMAGE_MESSAGE);
    }

    #[tokio::test]
    async fn upload_with_non_image_type_is_415() {
        let state = state_with(MockProvider::new("mock"));
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let (status, _) = respond(
            recognize_upload(State(state), Query(UploadQuery::default()), headers, Bytes::from_static(b"hello"))
                .await,
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
