//! Router assembly

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{get, post},
    Json, Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

use crate::auth::{auth_middleware, AuthState, JwtValidator};
use crate::constants::{API_PREFIX, ASSETS_ROUTE, MULTIPART_OVERHEAD_BYTES};
use crate::handlers::{health, thumbnail_upload, video_upload, videos};
use crate::state::AppState;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        validator: Arc::new(JwtValidator::new(&config.jwt_secret)),
    });

    let public_routes = Router::new()
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        );

    let protected_routes = protected_routes(config).layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let mut app = public_routes
        .merge(protected_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if config.storage_backend == StorageBackend::Local {
        tracing::info!(
            path = %config.local_storage_path.display(),
            route = ASSETS_ROUTE,
            "Serving local storage"
        );
        app = app.nest_service(ASSETS_ROUTE, ServeDir::new(&config.local_storage_path));
    }

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = app
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit(
            config
                .max_video_size_bytes
                .max(config.max_thumbnail_size_bytes),
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state);

    Ok(app)
}

fn protected_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/thumbnail_upload/{{videoID}}", API_PREFIX),
            post(thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(body_limit(config.max_thumbnail_size_bytes))),
        )
        .route(
            &format!("{}/video_upload/{{videoID}}", API_PREFIX),
            post(video_upload::upload_video)
                .layer(DefaultBodyLimit::max(body_limit(config.max_video_size_bytes))),
        )
        .route(&format!("{}/videos", API_PREFIX), get(videos::list_videos))
        .route(
            &format!("{}/videos/{{videoID}}", API_PREFIX),
            get(videos::get_video),
        )
}

/// Request body cap for a file cap: the file plus multipart framing.
fn body_limit(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Request span; `user_id` is filled in by the auth middleware.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        user_id = tracing::field::Empty,
    )
}
