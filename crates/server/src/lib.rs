//! HTTP surface of the coaching service.

pub mod config;
pub mod error;
pub mod routes;
pub mod usage_log;

use std::sync::Arc;

use analysis_client::{AnalysisPipeline, LichessClient};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::usage_log::UsageLog;

/// Shared services handed to every handler.
#[derive(Clone)]
pub struct Services {
    pub config: Config,
    pub pipeline: Arc<AnalysisPipeline>,
    pub lichess: Arc<LichessClient>,
    pub usage: UsageLog,
}

pub fn router(services: Services) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/api/health", get(routes::health::health_check))
        .route("/health", get(routes::health::health_check))
        // Usage logging
        .route("/api/log-usage", post(routes::usage::log_usage))
        .route("/api/log", post(routes::usage::log_usage))
        // PGN preview and analysis
        .route("/api/pgn/parse", post(routes::parse::parse_pgn))
        .route("/api/analysis", post(routes::analysis::analyze))
        .route("/api/providers", get(routes::analysis::list_providers))
        // Export
        .route("/api/export/pdf", post(routes::export::export_pdf))
        .route("/api/export/text", post(routes::export::export_text))
        // Shared state
        .layer(Extension(services.config))
        .layer(Extension(services.pipeline))
        .layer(Extension(services.lichess))
        .layer(Extension(services.usage))
        .layer(DefaultBodyLimit::max(routes::MAX_PGN_BYTES + 1024 * 1024))
        .layer(cors)
}
