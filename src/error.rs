//! Error types for fwintel.

use thiserror::Error;

/// Error type for fwintel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External command exited unsuccessfully
    #[error("{program} exited with {status}: {message}")]
    CommandFailed {
        program: String,
        status: String,
        message: String,
    },

    /// Invalid port number
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// Invalid protocol name
    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),

    /// Invalid IP address or network
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generated YARA source failed the structural check
    #[error("YARA syntax error: {0}")]
    YaraSyntax(String),
}

/// Result type alias for fwintel operations.
pub type Result<T> = std::result::Result<T, Error>;
