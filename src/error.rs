//! Error types for the Veridu client

use thiserror::Error;

/// Veridu client error
///
/// The first four variants are the response outcomes of the protocol and
/// are never folded into one another.
#[derive(Debug, Error)]
pub enum VeriduError {
    /// Response body is not valid JSON (carries the raw body)
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Response body is JSON but breaks the envelope contract (carries the raw body)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server reported a failure in the envelope
    #[error("{message}")]
    Api { error_type: String, message: String },

    /// Response did not echo the nonce of the signed request
    #[error("Nonce mismatch")]
    NonceMismatch,

    /// HTTP verb outside GET, POST, PUT and DELETE
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Veridu client operations
pub type Result<T> = std::result::Result<T, VeriduError>;
