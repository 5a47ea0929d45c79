use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::server;

/// Start the HTTP server with configuration from the platform config dir.
#[inline]
pub async fn serve() -> Result<()> {
    let config_dir = Config::config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;

    info!("Starting Culture Buddy server");
    server::serve(config).await
}

/// Print the resolved configuration. Secrets are reported as set/unset
/// only, never echoed.
#[inline]
pub fn show_config() -> Result<()> {
    let config_dir = Config::config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;

    println!("Configuration directory: {}", config_dir.display());
    println!(
        "Server: {}:{} (uploads in {})",
        config.server.host,
        config.server.port,
        config.upload_dir_path().display()
    );
    println!(
        "OpenAI: {} (embeddings: {}, completions: {})",
        config.openai.api_base, config.openai.embedding_model, config.openai.completion_model
    );
    println!("Vector index: {}", config.pinecone.index_host);
    println!("Secrets: {:?}", config.secrets);

    Ok(())
}
