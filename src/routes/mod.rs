mod payload;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::auth::TokenManager;
use crate::config::{Capability, Config};
use crate::error::ApiError;
use crate::http_client::UpstreamClient;
use crate::middleware;
use crate::models::{baidu, Envelope, Params};

pub use payload::Payload;

/// Application version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Wire the token manager and upstream client from configuration
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        let token_manager = Arc::new(TokenManager::new(client.clone(), &config));
        let upstream = Arc::new(UpstreamClient::new(
            client,
            token_manager,
            config.base_url.clone(),
        ));

        Self {
            config: Arc::new(config),
            upstream,
        }
    }

    /// Call an operation under a capability and wrap the result
    async fn invoke(
        &self,
        capability: Capability,
        suffix: &str,
        params: Params,
        method: Method,
    ) -> Result<Json<Envelope>, ApiError> {
        let data = self
            .upstream
            .call(&capability.endpoint(suffix), &params, method, None)
            .await?;

        Ok(Json(Envelope::success(data)))
    }
}

/// Build the application with all routes and middleware
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes(state.clone()))
        .merge(capability_routes(state))
        .fallback(not_found_handler)
        // Apply middleware stack: CORS → panic fallback → logging
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(middleware::cors_layer())
}

/// Health and info routes
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(api_health_handler))
        .route("/api/info", get(info_handler))
        .with_state(state)
}

/// Capability routes forwarding to the AI platform
pub fn capability_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/ocr/general_basic",
            post(ocr_general_basic_handler).fallback(not_found_handler),
        )
        .route("/api/tts", post(tts_handler).fallback(not_found_handler))
        .route(
            "/api/nlp/sentiment_classify",
            post(sentiment_classify_handler).fallback(not_found_handler),
        )
        .route(
            "/api/image-classify/advanced_general",
            post(advanced_general_handler).fallback(not_found_handler),
        )
        .with_state(state)
}

/// GET /health - Liveness check
///
/// Always succeeds, whether or not credentials are configured.
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Baidu AI gateway is running",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION
    }))
}

/// GET /api/health - Liveness check in envelope form
async fn api_health_handler() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Baidu AI gateway is running"
    }))
}

/// GET /api/info - Gateway version and available services
async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    let services: Vec<&str> = Capability::ALL.iter().map(|c| c.name()).collect();

    Json(json!({
        "success": true,
        "message": "Baidu AI gateway",
        "version": VERSION,
        "services": services,
        "env": state.config.environment,
    }))
}

/// POST /api/ocr/general_basic - General text recognition
async fn ocr_general_basic_handler(
    State(state): State<AppState>,
    Payload(fields): Payload,
) -> Result<Json<Envelope>, ApiError> {
    tracing::info!("Request to /api/ocr/general_basic");

    let params = baidu::ocr_general_basic(&fields)?;
    state
        .invoke(Capability::Ocr, "/general_basic", params, Method::POST)
        .await
}

/// POST /api/tts - Speech synthesis
///
/// Forwarded upstream as a GET with the text in the query string.
async fn tts_handler(
    State(state): State<AppState>,
    Payload(fields): Payload,
) -> Result<Json<Envelope>, ApiError> {
    tracing::info!("Request to /api/tts");

    let params = baidu::tts(&fields)?;
    state.invoke(Capability::Tts, "", params, Method::GET).await
}

/// POST /api/nlp/sentiment_classify - Sentiment analysis
async fn sentiment_classify_handler(
    State(state): State<AppState>,
    Payload(fields): Payload,
) -> Result<Json<Envelope>, ApiError> {
    tracing::info!("Request to /api/nlp/sentiment_classify");

    let params = baidu::sentiment_classify(&fields)?;
    state
        .invoke(Capability::Nlp, "/sentiment_classify", params, Method::POST)
        .await
}

/// POST /api/image-classify/advanced_general - General object recognition
async fn advanced_general_handler(
    State(state): State<AppState>,
    Payload(fields): Payload,
) -> Result<Json<Envelope>, ApiError> {
    tracing::info!("Request to /api/image-classify/advanced_general");

    let params = baidu::advanced_general(&fields)?;
    state
        .invoke(
            Capability::ImageClassify,
            "/advanced_general",
            params,
            Method::POST,
        )
        .await
}

/// Any unmatched route
async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
