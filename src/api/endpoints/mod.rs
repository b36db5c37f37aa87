//! Endpoint handlers.
//!
//! `page` serves the interactive HTML surface; the rest form the JSON API
//! under `/api/`. Handlers delegate to the shared pipeline in `CoreState`.

pub mod forms;
pub mod health;
pub mod page;
pub mod sessions;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::pipeline::{DispatchOutcome, ExportedDocument};

/// Serve an exported document as a download.
pub(crate) fn pdf_attachment(doc: ExportedDocument) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.filename),
        )
        .header(header::CONTENT_LENGTH, doc.bytes.len().to_string())
        .body(axum::body::Body::from(doc.bytes))
        .unwrap_or_else(|_| {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
        })
}

/// HTTP status for a dispatch outcome.
pub(crate) fn outcome_status(outcome: &DispatchOutcome) -> StatusCode {
    match outcome {
        DispatchOutcome::Success { .. } => StatusCode::OK,
        DispatchOutcome::Incomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DispatchOutcome::InferenceFailed { .. } => StatusCode::BAD_GATEWAY,
    }
}
