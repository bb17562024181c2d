use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key for the pending PKCE code verifier.
pub const KEY_CODE_VERIFIER: &str = "code_verifier";
/// Storage key for the current access token.
pub const KEY_ACCESS_TOKEN: &str = "access_token";
/// Storage key for the current refresh token.
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
/// Storage key for the access token expiry (epoch milliseconds, decimal string).
pub const KEY_TOKEN_EXPIRY: &str = "token_expiry";

/// Persisted OAuth token state.
///
/// Contains the access token, the refresh token (when the provider issued
/// one), and the absolute expiry instant of the access token.
///
/// # Security
///
/// Tokens should never be logged. The `Debug` implementation redacts them.
///
/// # Examples
///
/// ```
/// use core_auth::TokenState;
///
/// let state = TokenState {
///     access_token: "BQ...".to_string(),
///     refresh_token: Some("AQ...".to_string()),
///     expires_at_epoch_ms: 1_700_000_000_000,
/// };
///
/// assert!(!state.is_valid_at(1_700_000_000_000)); // boundary is expired
/// assert!(state.is_valid_at(1_699_999_999_999));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens, when issued
    pub refresh_token: Option<String>,
    /// When the access token expires (epoch milliseconds)
    pub expires_at_epoch_ms: i64,
}

impl TokenState {
    /// Create a token state from an exchange response.
    ///
    /// # Arguments
    ///
    /// * `access_token` - the OAuth access token
    /// * `refresh_token` - the refresh token, when the provider returned one
    /// * `now_epoch_ms` - current wall-clock time in epoch milliseconds
    /// * `expires_in_seconds` - provider-reported token lifetime
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        now_epoch_ms: i64,
        expires_in_seconds: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at_epoch_ms: now_epoch_ms + expires_in_seconds * 1000,
        }
    }

    /// Check whether the access token is still valid at the given instant.
    ///
    /// Validity is strict: a token whose expiry equals `now_epoch_ms` is
    /// already expired.
    pub fn is_valid_at(&self, now_epoch_ms: i64) -> bool {
        now_epoch_ms < self.expires_at_epoch_ms
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at_epoch_ms", &self.expires_at_epoch_ms)
            .finish()
    }
}
