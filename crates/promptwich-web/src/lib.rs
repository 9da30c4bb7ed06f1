//! Browser-based builder UI server for the promptwich prompt engine.
//!
//! `promptwich-web` provides an axum REST server over one editing session:
//! the browser fetches declarations and the reconciled session snapshot,
//! posts edits (ingredient values, modifier toggles, global changes, preset
//! application), and re-renders from the assembled prompt the server
//! returns.
//!
//! # Quick start
//!
//! ```ignore
//! use promptwich::SessionState;
//! use promptwich_web::{AppState, ConfigStore, WebConfig, spawn_web};
//!
//! let store = ConfigStore::new("config");
//! let config = store.load_sandwich()?;
//! let globals_config = store.load_globals()?;
//! let session = SessionState::initialize(&config, &globals_config);
//!
//! let app_state = AppState::new(config, globals_config, session, store);
//! let addr = spawn_web(app_state, WebConfig::default()).await;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ConfigStore ──declarations──▶ AppState ◀──Arc<Mutex<SessionState>>──┐
//!                                  │                                  │
//!                    /api/config, /api/presets          /api/state, /api/values,
//!                                  │                    /api/globals, …
//!                                  ▼                                  ▼
//!                               browser ◀──────── assembled prompt ───┘
//! ```
//!
//! Every write handler completes its whole update (e.g. a global change plus
//! its dependent resets) while holding the session lock, so clients never
//! read an inconsistent state.

mod api;
mod server;
pub mod snapshot;
pub mod store;

pub use api::{AppState, GlobalRequest, ModifierRequest, PromptResponse, ValueRequest};
pub use snapshot::SessionSnapshot;
pub use store::{ConfigStore, is_safe_filename};

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3000`.
    pub bind_addr: SocketAddr,
    /// Path to the static frontend bundle (for production mode).
    ///
    /// If `None`, only the API is served — the frontend runs separately
    /// (e.g., a dev server on another port).
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// Bind to port 0 to get a random available port (used by the integration
/// tests). The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(app_state: AppState, config: WebConfig) -> SocketAddr {
    let router = server::build_router(app_state, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
