use crate::config::{AppConfig, CorsConfig};
use crate::server::{handlers, types::AppState};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// API routes only.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness))
        .route("/categories", get(handlers::categories))
        .route("/metrics", get(handlers::metrics))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}

/// API routes, the prebuilt frontend (if present), CORS and request tracing.
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let mut app = create_router(state);

    if let Some(frontend) = &config.frontend {
        app = with_frontend(app, &frontend.dir);
    }

    app.layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}

/// Serves `dir` for every unmatched path, falling back to `index.html` so
/// client-side routes resolve. A missing directory is skipped.
pub fn with_frontend(router: Router, dir: impl AsRef<Path>) -> Router {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "frontend directory missing; serving API only");
        return router;
    }

    let index = ServeFile::new(dir.join("index.html"));
    tracing::info!(dir = %dir.display(), "serving frontend");
    router.fallback_service(ServeDir::new(dir).fallback(index))
}

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
