use anyhow::Result;
use gemini_llm::{GeminiClient, GenerateClient, GenerateOptions, GenerateRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")?;
    let client = GeminiClient::new(api_key)?;

    let request = GenerateRequest::new("gemini-2.5-flash-preview-05-20", "What is the capital of France?")
        .with_system_instruction("Answer in one sentence.")
        .with_options(GenerateOptions::new().temperature(0.5).max_output_tokens(256));

    let response = client.generate(request).await?;

    println!("Response: {}", response.text.unwrap_or_default());

    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
