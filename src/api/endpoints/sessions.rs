//! Session endpoints.
//!
//! A session holds one client's active form and in-progress values:
//! - `POST   /api/sessions` — start a session
//! - `GET    /api/sessions/:id` — current form, values, warnings, result
//! - `PUT    /api/sessions/:id/form` — switch form (clears values)
//! - `PUT    /api/sessions/:id/fields` — merge raw values
//! - `POST   /api/sessions/:id/predict` — explicit trigger
//! - `GET    /api/sessions/:id/export` — PDF of the last result
//! - `DELETE /api/sessions/:id` — end the session

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use super::{outcome_status, pdf_attachment};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FieldReport, FieldsRequest, SelectFormRequest, SessionView};
use crate::core_state::CoreError;
use crate::forms::FormId;
use crate::pipeline::{export_result, CollectedInput};

/// `POST /api/sessions`
pub async fn create(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let mut sessions = ctx.core.write_sessions()?;
    let session = sessions.create();
    let view = SessionView::build(session, ctx.core.form(session.active_form()));
    tracing::debug!(session = %view.session_id, "Session created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/sessions/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = ctx.core.read_sessions()?;
    let session = sessions.get(&id).ok_or(CoreError::SessionNotFound(id))?;
    Ok(Json(SessionView::build(
        session,
        ctx.core.form(session.active_form()),
    )))
}

/// `DELETE /api/sessions/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if ctx.core.write_sessions()?.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::SessionNotFound(id).into())
    }
}

/// `PUT /api/sessions/:id/form`
pub async fn select_form(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SelectFormRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(request) = payload?;
    let form_id = FormId::from_slug(&request.form)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown form '{}'", request.form)))?;

    let mut sessions = ctx.core.write_sessions()?;
    let session = sessions.get_mut(&id).ok_or(CoreError::SessionNotFound(id))?;
    session.select_form(form_id);
    Ok(Json(SessionView::build(session, ctx.core.form(form_id))))
}

/// `PUT /api/sessions/:id/fields`
pub async fn set_fields(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FieldsRequest>, JsonRejection>,
) -> Result<Json<FieldReport>, ApiError> {
    let Json(request) = payload?;
    let values = request.into_raw()?;

    let mut sessions = ctx.core.write_sessions()?;
    let session = sessions.get_mut(&id).ok_or(CoreError::SessionNotFound(id))?;
    let form = ctx.core.form(session.active_form());

    let accepted = session.set_fields(form, values);
    let input = CollectedInput::collect(form, session.raw());

    Ok(Json(FieldReport {
        accepted,
        warnings: input.warnings(),
        coerced: input.coerced_count(),
        declared: form.field_count(),
        complete: input.is_complete(),
    }))
}

/// `POST /api/sessions/:id/predict`
///
/// 200 with the result, 422 when the completeness gate refuses, 502 when
/// the model fails. The body always carries the field warnings.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut sessions = ctx.core.write_sessions()?;
    let session = sessions.get_mut(&id).ok_or(CoreError::SessionNotFound(id))?;

    let report = ctx.core.predict(session.active_form(), session.raw())?;
    session.record_outcome(&report.outcome);

    Ok((outcome_status(&report.outcome), Json(report)).into_response())
}

/// `GET /api/sessions/:id/export`
pub async fn export(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let message = {
        let sessions = ctx.core.read_sessions()?;
        let session = sessions.get(&id).ok_or(CoreError::SessionNotFound(id))?;
        session
            .last_result()
            .map(|r| r.message.clone())
            .ok_or(ApiError::NoResult)?
    };

    let doc = export_result(&message)?;
    Ok(pdf_attachment(doc))
}
