//! Router and per-request middleware

use super::error::MessageResponse;
use super::handlers;
use super::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Response header echoing the request id used in the logs
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router
///
/// Each request runs inside a `request` span carrying a fresh UUID v4
/// `request_id` and is abandoned after `timeout`; an abandoned export is
/// never partially delivered.
pub fn router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/reports/:kind", get(handlers::get_report))
        .route("/export/:kind", get(handlers::export_report))
        .layer(middleware::from_fn_with_state(timeout, request_context))
        .with_state(state)
}

async fn request_context(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        teacher_id = tracing::field::Empty,
    );

    async move {
        let started = Instant::now();
        let mut response = match tokio::time::timeout(timeout, next.run(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "Request timed out");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(MessageResponse::failure(
                        "The request took too long. Please narrow the date range and try again.",
                    )),
                )
                    .into_response()
            }
        };

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
