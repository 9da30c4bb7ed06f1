//! Promptwich server binary.
//!
//! Loads the declaration documents from the config directory, initializes
//! one editing session, and serves the builder API (plus an optional static
//! frontend bundle) until ctrl-c.
//!
//! # Usage
//!
//! ```sh
//! promptwich-web
//! promptwich-web --port 8080
//! promptwich-web --config-dir /etc/promptwich --static-dir dist
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use promptwich::SessionState;
use promptwich_web::{AppState, ConfigStore, WebConfig, spawn_web};
use tracing_subscriber::EnvFilter;

/// Prompt builder web server.
#[derive(Parser)]
#[command(name = "promptwich-web")]
struct Cli {
    /// Port for the web UI server.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Directory holding sandwich.json, globals.json, and presets/.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Static frontend bundle served for non-API routes.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Both declaration documents are required; the session cannot start
    // without them.
    let store = ConfigStore::new(&cli.config_dir);
    let config = match store.load_sandwich() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let globals_config = match store.load_globals() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let session = SessionState::initialize(&config, &globals_config);
    let app_name = config.meta.app_name.clone();
    let app_state = AppState::new(config, globals_config, session, store);

    let web_config = WebConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], cli.port)),
        static_dir: cli.static_dir,
    };
    let addr = spawn_web(app_state, web_config).await;

    println!("🥪 {app_name} is running!");
    println!("📂 Config loaded from: {}", cli.config_dir.display());
    println!("🚀 Open http://{addr}");

    tokio::signal::ctrl_c().await.ok();
}
