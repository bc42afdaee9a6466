//! Axum router configuration with middleware.
//!
//! Routes: `POST /chat`, `POST /delete-data`, `GET /health`.
//! Middleware: CORS (any origin, method and header) and request tracing.
//!
//! When a static directory is configured and exists, unknown paths (including
//! `/`) are served from it, so `GET /` returns its `index.html`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_core::profile::repository::ProfileRepository;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router<M, P, V>(state: AppState<M, P, V>) -> Router
where
    M: MessageRepository + 'static,
    P: ProfileRepository + 'static,
    V: TokenVerifier + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.static_dir.clone();

    let mut router = Router::new()
        .route("/chat", post(handlers::chat::chat::<M, P, V>))
        .route("/delete-data", post(handlers::data::delete_data::<M, P, V>))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(dir) = static_dir.filter(|d| d.is_dir()) {
        tracing::info!(path = %dir.display(), "Static file serving enabled");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
