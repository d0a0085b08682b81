// Gemini-specific client implementation

use crate::gemini::wire::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig, WireContent,
};
use crate::traits::{GenerateClient, GenerateRequest, GenerateResponse, TokenUsage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, no SDK)
///
/// - URL: {base_url}/models/{model}:generateContent
/// - Auth header: x-goog-api-key
/// - Model is passed per request, so one client serves every model
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create new client against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create new Gemini client with builder pattern
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build generateContent request payload
    fn build_request(&self, request: &GenerateRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![WireContent::user(request.prompt.as_str())],
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(WireContent::instruction),
            generation_config: GenerationConfig {
                temperature: request.options.temperature,
                max_output_tokens: request.options.max_output_tokens,
            },
        }
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Builder for GeminiClient
#[derive(Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL
    /// Example: "https://generativelanguage.googleapis.com/v1beta"
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self.api_key.context("API key is required")?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GeminiClient {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl GenerateClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let payload = self.build_request(&request);
        let url = self.build_url(&request.model);

        tracing::debug!(model = %request.model, "sending generateContent request");

        // Strip the URL so the endpoint path never shows up in error text
        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_text);
            anyhow::bail!("Gemini API error ({}): {}", status, message);
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse response")?;
        let parsed: GenerateContentResponse =
            serde_json::from_value(raw.clone()).context("Unexpected response shape")?;

        // Convert to provider-agnostic response
        Ok(GenerateResponse {
            text: parsed.text(),
            finish_reason: parsed.finish_reason(),
            block_reason: parsed.block_reason(),
            usage: parsed.usage_metadata.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            raw,
        })
    }
}
