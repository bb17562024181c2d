//! PKCE (RFC 7636) verifier and challenge generation.
//!
//! The authorization flow uses the S256 method: a random code verifier is
//! generated and persisted at the start of the flow, and only its SHA-256
//! digest (base64-url-encoded without padding) travels in the
//! authorization URL. The verifier itself is sent exclusively to the token
//! endpoint during code exchange.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of characters in a generated code verifier.
///
/// RFC 7636 permits 43-128 characters; 64 matches what the provider's own
/// client examples use.
pub const VERIFIER_LENGTH: usize = 64;

const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// PKCE code verifier.
///
/// # Security
///
/// The verifier must be kept secret until code exchange and never logged.
/// Only the challenge (derived from the verifier) is sent during
/// authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct PkceVerifier {
    verifier: String,
}

impl PkceVerifier {
    /// Create a new verifier from cryptographically secure random values.
    ///
    /// Generates a 64-character alphanumeric string.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let verifier = (0..VERIFIER_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..VERIFIER_CHARSET.len());
                VERIFIER_CHARSET[idx] as char
            })
            .collect();
        Self { verifier }
    }

    /// Reconstruct a verifier from its persisted string form.
    pub fn from_stored(verifier: impl Into<String>) -> Self {
        Self {
            verifier: verifier.into(),
        }
    }

    /// Get the code verifier string.
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Compute the code challenge from the verifier.
    ///
    /// Uses S256 method: BASE64URL(SHA256(code_verifier))
    pub fn challenge(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.verifier.as_bytes());
        let hash = hasher.finalize();
        URL_SAFE_NO_PAD.encode(hash)
    }
}

impl Default for PkceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

// Custom Debug implementation to keep the verifier out of logs.
impl std::fmt::Debug for PkceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceVerifier")
            .field("verifier", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_length_and_charset() {
        let verifier = PkceVerifier::new();
        assert_eq!(verifier.verifier().len(), VERIFIER_LENGTH);
        assert!(verifier
            .verifier()
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_verifiers_are_unique() {
        let a = PkceVerifier::new();
        let b = PkceVerifier::new();
        assert_ne!(a.verifier(), b.verifier());
        assert_ne!(a.challenge(), b.challenge());
    }

    #[test]
    fn test_challenge_is_deterministic() {
        let verifier = PkceVerifier::new();
        assert_eq!(verifier.challenge(), verifier.challenge());
    }

    #[test]
    fn test_challenge_is_url_safe() {
        let challenge = PkceVerifier::new().challenge();
        assert!(!challenge.contains('+'));
        assert!(!challenge.contains('/'));
        assert!(!challenge.contains('='));
    }

    #[test]
    fn test_challenge_rfc7636_vector() {
        // Known vector from RFC 7636 Appendix B
        let verifier = PkceVerifier::from_stored("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(
            verifier.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_debug_redacts_verifier() {
        let verifier = PkceVerifier::new();
        let debug_str = format!("{:?}", verifier);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains(verifier.verifier()));
    }
}
