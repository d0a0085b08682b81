use anyhow::Result;
use gemini_llm::{ClientFactory, GeminiConfig, GenerateClient, GenerateRequest};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("Provider Factory Pattern Example");
    println!("=================================\n");

    let Ok(api_key) = std::env::var("GEMINI_API_KEY") else {
        println!("Skipped (GEMINI_API_KEY not set)");
        return Ok(());
    };

    let mut config = GeminiConfig::new(api_key);
    if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    let client: Arc<dyn GenerateClient> = ClientFactory::create_client(config)?;

    let request = GenerateRequest::new("gemini-2.5-flash-preview-05-20", "Say hello!");
    let response = client.generate(request).await?;
    println!("Response: {}", response.text.unwrap_or_default());
    println!("Finish reason: {:?}", response.finish_reason);

    Ok(())
}
