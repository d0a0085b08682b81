pub mod config;
pub mod gemini;
pub mod traits;

pub use traits::{GenerateClient, GenerateOptions, GenerateRequest, GenerateResponse, TokenUsage};

pub use config::{ClientFactory, GeminiConfig};
pub use gemini::GeminiClient;
