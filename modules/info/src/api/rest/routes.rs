use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing::field::Empty;

use super::handlers;
use crate::config::RootMode;
use crate::domain::service::InfoService;

/// All info routes, with a request span around each call
#[must_use]
pub fn router(service: Arc<InfoService>, root_mode: RootMode) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::cached_upstream))
        .route("/infos", get(handlers::list_infos).post(handlers::save_info))
        .route("/infos/{id}", get(handlers::get_info).delete(handlers::delete_info))
        .route("/health", get(handlers::health))
        .layer(Extension(service))
        .layer(Extension(root_mode))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(|res: &Response<Body>, latency: Duration, span: &Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                }),
        )
}
