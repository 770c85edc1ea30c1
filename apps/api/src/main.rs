mod config;
mod errors;
mod job_match;
mod llm_client;
mod portfolio;
mod routes;
mod state;
mod telemetry;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::job_match::JobMatchAnalyzer;
use crate::llm_client::LlmClient;
use crate::portfolio::load_portfolio;
use crate::routes::build_router;
use crate::state::AppState;
use crate::telemetry::{KeywordUsageTracker, NoopTracker, RedisKeywordTracker};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Portfolio profile + keyword taxonomy, read once
    let portfolio = load_portfolio(&config.portfolio_config_path).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Keyword usage telemetry is optional
    let usage: Arc<dyn KeywordUsageTracker> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Redis keyword usage tracking enabled");
            Arc::new(RedisKeywordTracker::new(redis))
        }
        None => {
            info!("REDIS_URL not set; keyword usage tracking disabled");
            Arc::new(NoopTracker)
        }
    };

    let analyzer = JobMatchAnalyzer::new(Arc::new(llm), &portfolio, usage);
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
