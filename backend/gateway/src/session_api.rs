//! Session marker endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use textlift_core::{SessionMetadata, SessionReset};

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionMetadata>,
}

/// Handler for `GET /api/session`
pub async fn get_session(State(state): State<GatewayState>) -> Json<SessionStatus> {
    let session = state.client.session();
    Json(SessionStatus {
        active: session.is_some(),
        session,
    })
}

/// Handler for `POST /api/session/reset`
pub async fn reset_session(State(state): State<GatewayState>) -> Json<SessionReset> {
    Json(state.client.reset_session())
}
