use gemini_llm::{GenerateClient, GenerateOptions, GenerateRequest};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Shared client bound to one model
///
/// Cheap to clone. A per-call variant carrying a system instruction is a new
/// handle; the shared one is never mutated.
#[derive(Clone)]
pub struct ClientHandle {
    client: Arc<dyn GenerateClient>,
    model: String,
    system_instruction: Option<String>,
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("model", &self.model)
            .field("system_instruction", &self.system_instruction)
            .finish_non_exhaustive()
    }
}

impl ClientHandle {
    pub fn new(client: Arc<dyn GenerateClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_instruction: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Variant of this handle that sends `instruction` with every request
    pub fn with_system_instruction(&self, instruction: impl Into<String>) -> Self {
        Self {
            client: Arc::clone(&self.client),
            model: self.model.clone(),
            system_instruction: Some(instruction.into()),
        }
    }

    /// Send one prompt to the model and classify the outcome
    ///
    /// Never fails past this boundary: every backend error comes back as a
    /// [`CallError`]. An empty system instruction is treated as absent.
    pub async fn call(
        &self,
        prompt: &str,
        temperature: f32,
        system_instruction: Option<&str>,
    ) -> CallResult {
        match system_instruction.filter(|s| !s.is_empty()) {
            Some(instruction) => {
                self.with_system_instruction(instruction)
                    .send(prompt, temperature)
                    .await
            }
            None => self.send(prompt, temperature).await,
        }
    }

    async fn send(&self, prompt: &str, temperature: f32) -> CallResult {
        let mut request = GenerateRequest::new(self.model.as_str(), prompt).with_options(
            GenerateOptions::new()
                .temperature(temperature)
                .max_output_tokens(MAX_OUTPUT_TOKENS),
        );
        if let Some(instruction) = &self.system_instruction {
            request = request.with_system_instruction(instruction.as_str());
        }

        tracing::debug!(
            model = %self.model,
            temperature,
            has_system_instruction = self.system_instruction.is_some(),
            "calling model"
        );

        let response = match self.client.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = CallError::classify(format!("{:#}", e));
                tracing::debug!(kind = %error.kind, "model call failed: {}", error.message);
                return Err(error);
            }
        };

        if let Some(text) = response.non_empty_text() {
            return Ok(Reply::Text(text.to_string()));
        }

        if response.content_filtered() {
            let reason = response
                .block_reason
                .or(response.finish_reason)
                .unwrap_or_else(|| "unspecified".to_string());
            tracing::debug!(%reason, "model response withheld");
            return Err(CallError::new(
                ErrorKind::SafetyFiltered,
                format!("Response blocked by safety filter (reason: {})", reason),
            ));
        }

        tracing::debug!("model returned no text");
        Ok(Reply::Empty)
    }
}

/// Successful outcome of a model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Backend answered without any text
    Empty,
}

pub type CallResult = Result<Reply, CallError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    SafetyFiltered,
    Generic,
}

impl ErrorKind {
    /// Classify a backend error message, first match wins
    ///
    /// Case-insensitive substring test: "quota"/"rate", then "safety"/"filter".
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota") || lower.contains("rate") {
            Self::RateLimited
        } else if lower.contains("safety") || lower.contains("filter") {
            Self::SafetyFiltered
        } else {
            Self::Generic
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RateLimited => "rate_limited",
            Self::SafetyFiltered => "safety_filtered",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CallError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from a raw backend error message
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorKind::classify(&message), message)
    }
}
