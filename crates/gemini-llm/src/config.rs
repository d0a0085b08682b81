// Configuration layer for LLM client creation
// This module provides a factory pattern for creating clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL for the Gemini API (optional, defaults to the public v1beta endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a generation client from provider configuration
    pub fn create_client(config: GeminiConfig) -> Result<Arc<dyn crate::traits::GenerateClient>> {
        let mut builder = crate::gemini::GeminiClient::builder().api_key(config.api_key);
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        Ok(Arc::new(builder.build()?))
    }
}
