//! Error types for the language-model client.

use thiserror::Error;

/// Errors that can occur when asking a language model for a completion
#[derive(Error, Debug)]
pub enum LlmError {
    /// Connection failed, timed out, or the body could not be read
    #[error("Failed to reach LLM service: {0}")]
    Network(String),

    /// Non-2xx response from the service
    #[error("LLM service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered but without any completion text
    #[error("LLM service returned no completion")]
    EmptyResponse,

    /// Completion text was not the JSON shape the caller asked for
    #[error("Invalid model output: {0}")]
    Parse(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, LlmError>;
