//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - Config/preset documents at `/api/config/*` and `/api/presets*`
/// - Session state and edits at `/api/state`, `/api/prompt`, `/api/values`,
///   `/api/modifiers`, `/api/globals`
/// - Optional static files for the frontend bundle
pub fn build_router(app_state: AppState, static_dir: Option<PathBuf>) -> Router {
    // CORS layer for development (frontend dev server on a different port).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/config/{filename}", get(api::get_config))
        .route("/api/presets", get(api::get_presets))
        .route("/api/presets/{filename}", get(api::get_preset))
        .route("/api/presets/{filename}/apply", post(api::apply_preset))
        .route("/api/state", get(api::get_state))
        .route("/api/prompt", get(api::get_prompt))
        .route("/api/values", post(api::post_value))
        .route("/api/modifiers", post(api::post_modifier))
        .route("/api/globals", post(api::post_global))
        .with_state(app_state);

    let mut router = Router::new().merge(api_routes).layer(cors);

    // Serve the static frontend bundle in production mode.
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Start the axum server and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}
