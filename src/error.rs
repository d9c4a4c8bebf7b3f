//! Error types for function invocation and configuration.

use thiserror::Error;

/// A typed handler refused or failed to process its event.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Everything that can go wrong between receiving an event and returning the function's output.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Could not serialize function result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{0}")]
    Handler(#[from] HandlerError),

    #[error("Stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Function '{name}' timed out after {seconds} seconds")]
    Timeout { name: String, seconds: u64 },

    #[error("Function aborted: {0}")]
    Join(String),
}

impl InvokeError {
    /// The `errorType` reported to callers.
    pub fn error_type(&self) -> &'static str {
        match self {
            InvokeError::FunctionNotFound(_) => "ResourceNotFoundException",
            InvokeError::InvalidPayload(_) => "InvalidRequestContentException",
            InvokeError::Serialize(_) => "SerializationException",
            InvokeError::Handler(_) => "HandlerException",
            InvokeError::Io(_) => "StreamException",
            InvokeError::Timeout { .. } => "TimeoutException",
            InvokeError::Join(_) => "RuntimeException",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Could not parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
