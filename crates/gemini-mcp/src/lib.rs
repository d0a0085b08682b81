pub mod adapter;
pub mod availability;
pub mod config;
pub mod server;
pub mod tools;

pub use adapter::{CallError, CallResult, ClientHandle, ErrorKind, Reply};
pub use availability::Availability;
pub use config::Config;
pub use server::GeminiServer;
pub use tools::AskArgs;
