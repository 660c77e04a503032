use anyhow::Result;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Liveness
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))

        // Model endpoints
        .route("/translate", post(handlers::translate))
        .route("/analyze", post(handlers::analyze))
}

/// CORS restricted to the configured origins, with credentials.
///
/// Methods and headers are mirrored from the preflight request, since a
/// credentialed response cannot use wildcards.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Full application router: routes, request tracing and CORS, bound to `state`.
///
/// Request bodies are not size-capped; CV texts of any length reach the models.
pub fn build_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.server_config.cors_origins)?;

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = Uuid::new_v4();
        tracing::info_span!(
            "request",
            %request_id,
            method = %request.method(),
            uri = %request.uri()
        )
    });

    Ok(Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(trace)
        .layer(cors)
        .with_state(state))
}
