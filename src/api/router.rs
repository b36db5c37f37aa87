//! Application router.
//!
//! Returns a composable `Router` that can be mounted on any axum server:
//! the HTML page at `/` and `/forms/...`, the JSON API under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Access log → Handler

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the full application router over shared state.
pub fn app_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/forms", get(endpoints::forms::list))
        .route("/forms/:slug", get(endpoints::forms::detail))
        .route("/sessions", post(endpoints::sessions::create))
        .route(
            "/sessions/:id",
            get(endpoints::sessions::get).delete(endpoints::sessions::remove),
        )
        .route("/sessions/:id/form", put(endpoints::sessions::select_form))
        .route("/sessions/:id/fields", put(endpoints::sessions::set_fields))
        .route("/sessions/:id/predict", post(endpoints::sessions::predict))
        .route("/sessions/:id/export", get(endpoints::sessions::export));

    let pages = Router::new()
        .route("/", get(endpoints::page::index))
        .route("/forms/:slug", get(endpoints::page::show))
        .route("/forms/:slug/predict", post(endpoints::page::predict))
        .route("/forms/:slug/export", post(endpoints::page::export));

    Router::new()
        .nest("/api", api)
        .merge(pages)
        .with_state(ctx)
        // Layers are applied from bottom (innermost) to top (outermost).
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
