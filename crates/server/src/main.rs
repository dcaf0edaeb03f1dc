use std::sync::Arc;

use analysis_client::{AnalysisPipeline, LichessClient, ProviderRegistry};
use server::config::Config;
use server::usage_log::UsageLog;
use server::{router, Services};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let registry = Arc::new(ProviderRegistry::with_defaults());
    let default_provider = config.analysis.provider;
    match registry.preload(default_provider) {
        Ok(()) => tracing::info!(provider = %default_provider, "Default analysis provider ready"),
        Err(e) => tracing::warn!("Failed to preload {default_provider}: {e}"),
    }
    let configured = config.analysis.configured_providers();
    if configured.is_empty() {
        tracing::info!("No provider API keys configured - requests must supply their own");
    } else {
        tracing::info!("API keys configured for {configured:?}");
    }

    let services = Services {
        pipeline: Arc::new(AnalysisPipeline::new(registry, config.analysis.clone())),
        lichess: Arc::new(LichessClient::new()?),
        usage: UsageLog::new(&config.usage_log_dir),
        config: config.clone(),
    };
    tracing::info!("Usage log at {}", services.usage.path().display());

    let app = router(services);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
