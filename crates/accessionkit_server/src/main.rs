#![forbid(unsafe_code)]

use accessionkit_server::{AppConfig, AppState, build_router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = AppConfig::load().map_err(|e| e.to_string())?;
    init_tracing(config.log_json);

    let store_options = config.to_store_options();
    info!(
        primary = %store_options.path_file_primary.display(),
        secondary = %store_options.path_file_secondary.display(),
        merge_mode = ?config.merge.mode,
        "configuration loaded"
    );

    let app = build_router(AppState::from_config(&config));
    let bind_addr = config.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed on {bind_addr}: {e}"))?;
    info!("Server running on http://{bind_addr}");
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server failed: {e}"))
}
