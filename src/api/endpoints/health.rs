//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::inference::LoadedModelInfo;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub active_sessions: usize,
    pub models: Vec<LoadedModelInfo>,
}

/// `GET /api/health` — liveness plus what was loaded at startup.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let active_sessions = ctx.core.read_sessions()?.len();

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        started_at: ctx.core.started_at(),
        active_sessions,
        models: ctx.core.models().loaded().to_vec(),
    }))
}
