//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::services::LoadState;

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storages: Option<&'static str>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Loading,
}

fn load_state_name(state: LoadState) -> &'static str {
    match state {
        LoadState::NotLoaded => "not_loaded",
        LoadState::Loading => "loading",
        LoadState::Loaded => "loaded",
    }
}

/// Returns 200 while the process is up
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        storages: None,
    };

    (StatusCode::OK, Json(response))
}

/// Returns 503 until every enabled storage has been loaded
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let load_state = state.load_gate.state();
    let (status_code, status) = match load_state {
        LoadState::Loaded => (StatusCode::OK, HealthStatus::Healthy),
        LoadState::NotLoaded | LoadState::Loading => {
            (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Loading)
        }
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        storages: Some(load_state_name(load_state)),
    };

    (status_code, Json(response))
}
