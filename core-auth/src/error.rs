//! Error types for the auth crate.

use thiserror::Error;

/// Errors produced by the authorization flow and token lifecycle.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The callback arrived without a stored code verifier.
    ///
    /// Completing authorization is only possible for a flow this client
    /// started. No token request is made in this case.
    #[error("No authorization in progress: code verifier not found")]
    MissingVerifier,

    /// The token endpoint answered with a non-success status.
    #[error("Token endpoint returned {code}: {description}")]
    Provider {
        /// HTTP status code from the token endpoint
        code: u16,
        /// Provider-supplied error description (or raw body)
        description: String,
    },

    /// The request never reached the token endpoint.
    #[error("Network error: {0}")]
    Network(String),

    /// The key-value store failed to read or write token state.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catch-all for URL construction and encoding faults.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
