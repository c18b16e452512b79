//! Gateway Health API

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "textlift",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.client.provider_name().to_string(),
        model: state.client.model().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::test_support::state_with;
    use textlift_understanding::MockProvider;

    #[tokio::test]
    async fn reports_provider_and_model() {
        let Json(report) = get_health(State(state_with(MockProvider::new("stub")))).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.service, "textlift");
        assert_eq!(report.provider, "stub");
        assert_eq!(report.model, "mock");
    }
}
