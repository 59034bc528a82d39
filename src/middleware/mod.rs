// CORS, request logging and panic fallback middleware

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;
use std::time::Instant;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::models::Envelope;

/// Request logging middleware
///
/// Logs method, path, status and latency of every request under a short
/// request id.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    tracing::info!("[{}] {} {}", request_id, method, path);

    let response = next.run(request).await;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status();
    if status.is_server_error() {
        tracing::error!(
            "[{}] {} {} -> {} ({:.1}ms)",
            request_id,
            method,
            path,
            status.as_u16(),
            latency_ms
        );
    } else {
        tracing::info!(
            "[{}] {} {} -> {} ({:.1}ms)",
            request_id,
            method,
            path,
            status.as_u16(),
            latency_ms
        );
    }

    response
}

/// Create CORS middleware layer
///
/// Configures CORS to allow all origins, methods, and headers.
/// Handles OPTIONS preflight requests automatically.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
}

/// Last-resort handler for panics inside request handlers
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("Unhandled error: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure("Internal server error")),
    )
        .into_response()
}
