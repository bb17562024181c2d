//! # Core Configuration Module
//!
//! Provides configuration management for the game core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`CoreConfig`] instance holding all injected capabilities and provider
//! settings the core needs. It enforces fail-fast validation so a missing
//! capability surfaces at startup with an actionable message instead of as
//! a latent runtime fault.
//!
//! ## Required Dependencies
//!
//! - `KeyValueStore` - persistence for verifier/token state
//! - `HttpClient` - token endpoint, catalog and playback command calls
//! - `client_id` / `redirect_uri` - OAuth application settings
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - wall-clock source (default: [`SystemClock`])
//! - endpoint URLs, scopes, poll interval, search limit
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .client_id("my-client-id")
//!     .redirect_uri("http://localhost:8080/callback")
//!     .key_value_store(Arc::new(MyStore))
//!     .http_client(Arc::new(MyHttpClient))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, KeyValueStore, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Default authorization endpoint (browser navigation target).
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Default token endpoint (code exchange and refresh).
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Default base URL for catalog and playback command endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Scopes the embedded player and playback commands require.
pub const DEFAULT_SCOPES: &[&str] = &[
    "streaming",
    "user-read-email",
    "user-read-private",
    "user-modify-playback-state",
    "user-read-playback-state",
];

/// Default interval between playback position samples.
pub const DEFAULT_POSITION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of results requested from catalog search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Core configuration for the game core.
///
/// Holds all dependencies and settings required to initialize the auth
/// manager and game controller. Use [`CoreConfig::builder`] to construct.
#[derive(Clone)]
pub struct CoreConfig {
    /// OAuth client identifier of the registered application
    pub client_id: String,

    /// Redirect URI the authorization callback lands on
    pub redirect_uri: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,

    /// Authorization endpoint URL
    pub authorize_url: String,

    /// Token endpoint URL
    pub token_url: String,

    /// Base URL for catalog/playback API calls
    pub api_base_url: String,

    /// Interval between playback position samples while playing
    pub position_poll_interval: Duration,

    /// Maximum number of catalog search results to request
    pub search_limit: u32,

    /// Persistent key-value storage (required)
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// HTTP client for remote calls (required)
    pub http_client: Arc<dyn HttpClient>,

    /// Wall-clock source (defaults to the system clock)
    pub clock: Arc<dyn Clock>,
}

impl CoreConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .field("position_poll_interval", &self.position_poll_interval)
            .field("search_limit", &self.search_limit)
            .finish()
    }
}

/// Builder for [`CoreConfig`] with fail-fast validation.
#[derive(Default)]
pub struct CoreConfigBuilder {
    client_id: Option<String>,
    redirect_uri: Option<String>,
    scopes: Option<Vec<String>>,
    authorize_url: Option<String>,
    token_url: Option<String>,
    api_base_url: Option<String>,
    position_poll_interval: Option<Duration>,
    search_limit: Option<u32>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreConfigBuilder {
    /// Set the OAuth client identifier (required).
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth redirect URI (required).
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Override the requested OAuth scopes.
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Override the authorization endpoint URL.
    pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = Some(url.into());
        self
    }

    /// Override the token endpoint URL.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Override the API base URL (useful for stub servers in tests).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Override the position polling interval.
    pub fn position_poll_interval(mut self, interval: Duration) -> Self {
        self.position_poll_interval = Some(interval);
        self
    }

    /// Override the catalog search result limit.
    pub fn search_limit(mut self, limit: u32) -> Self {
        self.search_limit = Some(limit);
        self
    }

    /// Inject the persistent key-value store (required).
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Inject the HTTP client (required).
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Inject a custom wall-clock source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration and builds a [`CoreConfig`].
    ///
    /// # Errors
    ///
    /// - `Error::Config` when `client_id` or `redirect_uri` is missing or empty
    /// - `Error::CapabilityMissing` when a required bridge is not injected
    pub fn build(self) -> Result<CoreConfig> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Config("client_id is required and must be non-empty".into()))?;

        let redirect_uri = self
            .redirect_uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| {
                Error::Config("redirect_uri is required and must be non-empty".into())
            })?;

        let key_value_store = self.key_value_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "KeyValueStore".to_string(),
            message: "No key-value store implementation provided. \
                      Web: wrap localStorage. Desktop: use bridge-desktop. \
                      Tests: use an in-memory store."
                .to_string(),
        })?;

        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client implementation provided. \
                      Desktop: use bridge-desktop's ReqwestHttpClient. \
                      Tests: use a stub client."
                .to_string(),
        })?;

        Ok(CoreConfig {
            client_id,
            redirect_uri,
            scopes: self
                .scopes
                .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()),
            authorize_url: self
                .authorize_url
                .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
            token_url: self.token_url.unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            position_poll_interval: self
                .position_poll_interval
                .unwrap_or(DEFAULT_POSITION_POLL_INTERVAL),
            search_limit: self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            key_value_store,
            http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
