use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::portfolio::models::PortfolioConfig;

/// Reads and parses the portfolio JSON file. Called once at startup.
pub async fn load_portfolio(path: impl AsRef<Path>) -> Result<PortfolioConfig> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read portfolio config at {}", path.display()))?;

    let config: PortfolioConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Portfolio config at {} is not valid JSON", path.display()))?;

    if config.keywords.is_empty() {
        warn!(
            "Portfolio config at {} has no keywords; job matching will rely on the model alone",
            path.display()
        );
    }

    info!(
        "Loaded portfolio for '{}' ({} keywords, {} projects)",
        config.profile.name,
        config.keywords.len(),
        config.profile.projects.len()
    );

    Ok(config)
}
