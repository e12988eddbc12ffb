pub mod client;
pub mod error;
pub mod types;

pub use client::{CompletionSender, OpenAiClient};
pub use error::OpenAiError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, Usage};
