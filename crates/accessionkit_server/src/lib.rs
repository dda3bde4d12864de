#![forbid(unsafe_code)]
//! HTTP surface for the accession catalog.

use std::sync::Arc;

use accessionkit_catalog::CatalogService;
use accessionkit_io_fs::DatasetStore;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

pub mod config;
pub mod error;
mod http;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;

/// Shared request state; cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub cors_allowed_origins: Arc<Vec<String>>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        service: CatalogService,
        cors_allowed_origins: Vec<String>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            service: Arc::new(service),
            cors_allowed_origins: Arc::new(cors_allowed_origins),
            max_body_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let service = CatalogService::new(
            DatasetStore::new(config.to_store_options()),
            config.to_merge_options(),
            config.to_export_options(),
        );
        Self::new(
            service,
            config.server.cors_allowed_origins.clone(),
            config.server.max_body_bytes,
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/data", get(http::data_handler))
        .route("/api/merged", get(http::merged_handler))
        .route("/api/download", get(http::download_handler))
        .route("/api/save", post(http::save_handler))
        .route("/healthz", get(http::healthz_handler))
        .layer(from_fn_with_state(state.clone(), http::cors_middleware))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}
