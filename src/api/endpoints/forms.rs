//! Form catalog endpoints.
//!
//! - `GET /api/forms` — side menu
//! - `GET /api/forms/:slug` — full definition (fields, choices, rule)

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FormSummary};
use crate::forms::FormDefinition;

/// `GET /api/forms`
pub async fn list(State(ctx): State<ApiContext>) -> Json<Vec<FormSummary>> {
    Json(ctx.core.catalog().iter().map(FormSummary::from).collect())
}

/// `GET /api/forms/:slug`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(slug): Path<String>,
) -> Result<Json<FormDefinition>, ApiError> {
    ctx.form_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Form '{slug}' not found")))
}
