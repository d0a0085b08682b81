use crate::adapter::ClientHandle;
use crate::config::Config;
use anyhow::{anyhow, Result};
use gemini_llm::{ClientFactory, GeminiConfig, GenerateClient};
use std::sync::Arc;

pub const MISSING_KEY_ERROR: &str =
    "Please set your Gemini API key in the GEMINI_API_KEY environment variable";

/// Process-wide readiness, decided once at startup
///
/// Never changes afterwards. When unavailable, tools answer without touching
/// the network.
#[derive(Debug, Clone)]
pub enum Availability {
    Available(ClientHandle),
    Unavailable { error: String },
}

impl Availability {
    /// Build the client from configuration, failing closed
    pub fn establish(config: &Config) -> Self {
        match Self::connect(config) {
            Ok(handle) => {
                tracing::info!(model = %handle.model(), "Gemini client ready");
                Self::Available(handle)
            }
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!("Gemini unavailable: {}", error);
                Self::Unavailable { error }
            }
        }
    }

    fn connect(config: &Config) -> Result<ClientHandle> {
        let api_key = config.api_key().ok_or_else(|| anyhow!(MISSING_KEY_ERROR))?;

        let mut provider = GeminiConfig::new(api_key);
        if let Some(base_url) = &config.gemini_base_url {
            provider = provider.with_base_url(base_url.as_str());
        }

        let client = ClientFactory::create_client(provider)?;
        Ok(ClientHandle::new(client, config.model_name.as_str()))
    }

    pub fn available(client: Arc<dyn GenerateClient>, model: impl Into<String>) -> Self {
        Self::Available(ClientHandle::new(client, model))
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn handle(&self) -> Option<&ClientHandle> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.handle().map(ClientHandle::model)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { error } => Some(error),
        }
    }
}
