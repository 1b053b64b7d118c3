//! Error types for chain queries.

use thiserror::Error;

/// Errors that can occur while querying a chain node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The request never produced a usable HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we asked for
    #[error("Decode error: {0}")]
    Decode(String),

    /// A value was present but not in the expected numeric encoding
    #[error("Format error: {0}")]
    Format(String),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Decode(err.to_string())
    }
}

/// Result type for chain queries.
pub type ChainResult<T> = Result<T, ChainError>;
