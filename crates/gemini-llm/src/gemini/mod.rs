pub mod client;
pub mod wire;

pub use client::{GeminiClient, GeminiClientBuilder, GEMINI_API_BASE};
pub use wire::{GenerateContentRequest, GenerateContentResponse};
