//! # Authentication Core
//!
//! Implements the OAuth 2.0 authorization-code flow with PKCE (RFC 7636)
//! against the music provider's accounts service, plus the persisted
//! token lifecycle the rest of the core consumes.
//!
//! ## Architecture
//!
//! - [`pkce`]: code verifier generation and S256 challenge computation
//! - [`types`]: persisted [`TokenState`] and the fixed storage keys
//! - [`manager`]: [`AuthManager`] orchestrating the flow end to end
//!
//! All persistence goes through the injected
//! [`KeyValueStore`](bridge_traits::storage::KeyValueStore); all network
//! traffic goes through the injected
//! [`HttpClient`](bridge_traits::http::HttpClient). Wall-clock reads use
//! the injected [`Clock`](bridge_traits::time::Clock), which makes token
//! expiry behavior fully deterministic under test.
//!
//! ## Security
//!
//! - No client secret: PKCE protects the public client
//! - Tokens and verifiers are never logged; `Debug` implementations redact
//! - Token validity is strict: expiry at the current instant means expired

pub mod error;
pub mod manager;
pub mod pkce;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::{redirect_uri_from_origin, AuthManager};
pub use pkce::PkceVerifier;
pub use types::{
    TokenState, KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRY,
};
