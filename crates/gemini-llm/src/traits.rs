use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for single-shot text generation (Gemini generateContent, etc)
///
/// One request in, one complete response out. Implementations never retry.
#[async_trait]
pub trait GenerateClient: Send + Sync {
    /// Non-streaming text generation
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }
}

/// Provider-agnostic generation result
///
/// `text` is `None` when the backend produced no text part at all, which is
/// normal for blocked prompts and for candidates stopped by a safety filter.
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
    /// Set when the prompt itself was rejected before generation
    pub block_reason: Option<String>,
    pub usage: Option<TokenUsage>,
    pub raw: serde_json::Value,
}

impl GenerateResponse {
    /// Response carrying plain text and nothing else
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Response without any text part
    pub fn empty() -> Self {
        Self::default()
    }

    /// Text if present and non-empty
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the backend withheld content for policy reasons
    pub fn content_filtered(&self) -> bool {
        if self.block_reason.is_some() {
            return true;
        }
        matches!(
            self.finish_reason.as_deref(),
            Some("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" | "RECITATION")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}
