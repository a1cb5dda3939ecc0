pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers;
use crate::api::middleware::request_id::{X_REQUEST_ID, request_id_middleware};
use crate::config::ServiceConfig;
use crate::services::digest::DigestService;
use crate::services::staging::UploadStager;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::hash::hash_file,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::HashAlgorithm,
            models::DigestResult,
            models::ErrorResponse,
            models::HashFileForm,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "hashing", description = "File digest endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub digest: Arc<DigestService>,
    pub stager: Arc<UploadStager>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            digest: Arc::new(DigestService::new(config.block_size)),
            stager: Arc::new(UploadStager::new(config.temp_dir.clone())),
            config: Arc::new(config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::index::index))
        .route("/static/app.js", get(handlers::index::app_js))
        .route("/health", get(handlers::health::health_check))
        .route("/hash-file", post(handlers::hash::hash_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get(&X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    info!("📥 {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        info!(
                            "📤 Finished in {:?} with status {}",
                            latency,
                            response.status()
                        );
                    },
                ),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
