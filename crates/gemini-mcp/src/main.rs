use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gemini_mcp::{Availability, Config, GeminiServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Gemini MCP server");

    // A missing key does not abort startup; the server reports itself offline
    let availability = Availability::establish(&config);

    let service = GeminiServer::new(availability)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start MCP service: {:?}", e))?;

    tracing::info!("Serving MCP over stdio");
    service.waiting().await?;

    Ok(())
}

/// Logs go to stderr; stdout carries the protocol
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}
