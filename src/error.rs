// Error handling module
// Defines the failure taxonomy for the request layer

use thiserror::Error;

/// Errors surfaced by the request layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Session renewal was attempted and failed; the caller must send the
    /// user back through the login flow
    #[error("Session expired: re-authentication required")]
    SessionExpired,

    /// Transport-level failure (connect, timeout, protocol, body decode)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response from an account endpoint
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Store(#[source] anyhow::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Whether this failure requires the user to re-authenticate
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

/// Result type alias for request-layer operations
pub type Result<T> = std::result::Result<T, ApiError>;
