//! Tool bodies, independent of the MCP transport
//!
//! Every function here returns the final user-facing string. Rendering of
//! [`CallResult`] happens only in this module.

use crate::adapter::{CallResult, ErrorKind, Reply, DEFAULT_TEMPERATURE};
use crate::availability::Availability;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SERVER_NAME: &str = "Gemini MCP Server";
pub const RESPONSE_LABEL: &str = "🤖 GEMINI RESPONSE:\n\n";
pub const UNAVAILABLE_PREFIX: &str = "❌ Gemini not available: ";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Error: Gemini returned an empty response. This may be due to content filtering or API limitations.";

/// Arguments of the `ask` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AskArgs {
    /// The question or prompt for Gemini
    pub prompt: String,
    /// Temperature for response (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Additional context to provide to Gemini
    #[serde(default)]
    pub context: String,
    /// Persona for Gemini to adopt (e.g., "senior architect", "security expert")
    #[serde(default)]
    pub persona: String,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl AskArgs {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            context: String::new(),
            persona: String::new(),
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }
}

/// Prompt actually sent to the model
pub fn compose_prompt(prompt: &str, context: &str) -> String {
    if context.is_empty() {
        prompt.to_string()
    } else {
        format!("Context: {}\n\nQuery: {}", context, prompt)
    }
}

/// System instruction for a persona, if any
pub fn persona_instruction(persona: &str) -> Option<String> {
    if persona.is_empty() {
        return None;
    }
    Some(format!(
        "You are acting as a {}. Respond in character with appropriate expertise and perspective.",
        persona
    ))
}

/// `ask` tool: forward a prompt to Gemini
pub async fn ask(availability: &Availability, args: AskArgs) -> String {
    let handle = match availability {
        Availability::Available(handle) => handle,
        Availability::Unavailable { error } => {
            return format!("{}{}", UNAVAILABLE_PREFIX, error);
        }
    };

    let prompt = compose_prompt(&args.prompt, &args.context);
    let instruction = persona_instruction(&args.persona);

    let result = handle
        .call(&prompt, args.temperature, instruction.as_deref())
        .await;

    format!("{}{}", RESPONSE_LABEL, render_call_result(&result))
}

/// `status` tool: availability report, no network
pub fn status(availability: &Availability) -> String {
    let state = if availability.is_available() {
        "✅ ONLINE"
    } else {
        "❌ OFFLINE"
    };

    let mut output = format!("🤖 GEMINI MCP SERVER STATUS: {}\n\n", state);
    output.push_str(&format!("Server Name: {}\n", SERVER_NAME));
    let available = if availability.is_available() { "True" } else { "False" };
    output.push_str(&format!("Gemini Available: {}\n", available));
    output.push_str(&format!("Model: {}\n", availability.model().unwrap_or("N/A")));
    if let Some(error) = availability.error() {
        output.push_str(&format!("Error: {}\n", error));
    }

    output
}

/// User-facing text for a model call
pub fn render_call_result(result: &CallResult) -> String {
    match result {
        Ok(Reply::Text(text)) => text.clone(),
        Ok(Reply::Empty) => EMPTY_RESPONSE_MESSAGE.to_string(),
        Err(error) => match error.kind {
            ErrorKind::RateLimited => format!(
                "Rate limit or quota exceeded. Please try again later. Details: {}",
                error.message
            ),
            ErrorKind::SafetyFiltered => format!(
                "Content was filtered due to safety policies. Please rephrase your request. Details: {}",
                error.message
            ),
            ErrorKind::Generic => format!("Error calling Gemini: {}", error.message),
        },
    }
}
