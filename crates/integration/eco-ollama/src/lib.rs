//! Local LLM eco-advice
//!
//! Talks to an Ollama server's `/api/generate` endpoint with a fixed
//! environmental-assistant framing. The [`AdviceProvider`] trait is the seam
//! the dashboard holds, so other backends can slot in.

pub mod provider;

pub use provider::{frame_prompt, Advice, AdviceProvider, OllamaProvider, ProviderStatus};

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "mistral";

#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Please enter a question for the AI")]
    EmptyQuestion,

    #[error("Connection error: {0}")]
    ConnectionFailed(String),

    #[error("Ollama server error: {0}")]
    ServerStatus(u16),

    #[error("AI did not return a response")]
    EmptyReply,

    #[error("Malformed Ollama response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, OllamaError>;
