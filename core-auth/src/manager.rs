//! Auth manager: authorization flow orchestration and token lifecycle.
//!
//! Ties together the PKCE helpers, the injected key-value store and the
//! HTTP client into the operations the rest of the core consumes:
//! starting an authorization flow, completing it from the callback code,
//! producing a bearer token for remote calls, refreshing, and signing out.
//!
//! # Token validity
//!
//! Expiry is tracked as an absolute epoch-millisecond instant persisted
//! next to the token. A cached token is served only while the injected
//! clock reads strictly before that instant; refresh is a separate,
//! explicit operation with no retry loop.

use crate::error::{AuthError, Result};
use crate::pkce::PkceVerifier;
use crate::types::{
    TokenState, KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRY,
};
use bridge_traits::http::{HttpMethod, HttpRequest};
use bytes::Bytes;
use core_runtime::{AuthEvent, CoreConfig, CoreEvent, EventBus};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};
use url::Url;

/// Compute the redirect URI from a page origin and deployment base path.
///
/// Mirrors how the hosted client derives its callback location: the
/// origin, then the base path under which the app is served (empty in
/// development), then the dedicated `/callback` entry point the flow
/// resumes on.
///
/// # Examples
///
/// ```
/// use core_auth::manager::redirect_uri_from_origin;
///
/// assert_eq!(
///     redirect_uri_from_origin("http://localhost:3000", ""),
///     "http://localhost:3000/callback"
/// );
/// assert_eq!(
///     redirect_uri_from_origin("https://example.github.io", "/juego_pakete"),
///     "https://example.github.io/juego_pakete/callback"
/// );
/// ```
pub fn redirect_uri_from_origin(origin: &str, base_path: &str) -> String {
    format!("{}{}/callback", origin.trim_end_matches('/'), base_path)
}

/// Orchestrates the PKCE authorization flow and the token lifecycle.
///
/// All state lives in the injected key-value store, so a new manager
/// instance picks up where a previous session left off.
///
/// # Examples
///
/// ```ignore
/// use core_auth::AuthManager;
/// use core_runtime::{CoreConfig, EventBus};
///
/// # async fn example(config: CoreConfig) -> core_auth::Result<()> {
/// let manager = AuthManager::new(config, EventBus::default());
///
/// let auth_url = manager.begin_authorization().await?;
/// // Navigate the user to auth_url; the callback yields a code.
/// # Ok(())
/// # }
/// ```
pub struct AuthManager {
    config: CoreConfig,
    events: EventBus,
}

impl AuthManager {
    /// Create a new auth manager from the core configuration.
    pub fn new(config: CoreConfig, events: EventBus) -> Self {
        Self { config, events }
    }

    /// Start an authorization flow.
    ///
    /// Generates a fresh PKCE verifier, persists it under the
    /// `code_verifier` key, and returns the authorization URL the host
    /// should navigate to. Starting a new flow overwrites any previous
    /// pending verifier.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage` when the verifier cannot be persisted
    /// - `AuthError::Other` when the authorization URL cannot be built
    #[instrument(skip(self))]
    pub async fn begin_authorization(&self) -> Result<String> {
        let verifier = PkceVerifier::new();

        self.config
            .key_value_store
            .set(KEY_CODE_VERIFIER, verifier.verifier())
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| AuthError::Other(format!("Invalid authorize URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("scope", &self.config.scopes.join(" "));
            query.append_pair("code_challenge_method", "S256");
            query.append_pair("code_challenge", &verifier.challenge());
            query.append_pair("redirect_uri", &self.config.redirect_uri);
        }

        debug!("Built authorization URL");
        self.events
            .emit(CoreEvent::Auth(AuthEvent::AuthorizationStarted))
            .ok();

        Ok(url.to_string())
    }

    /// Complete an authorization flow from the callback code.
    ///
    /// Loads the pending verifier, exchanges `code` + verifier at the
    /// token endpoint, persists the resulting token state and deletes the
    /// verifier.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingVerifier` when no verifier is stored; no
    ///   token request is made in this case
    /// - `AuthError::Provider` when the token endpoint rejects the code
    /// - `AuthError::Network` when the request never reaches the endpoint
    /// - `AuthError::Storage` when token state cannot be persisted
    #[instrument(skip(self, code))]
    pub async fn complete_authorization(&self, code: &str) -> Result<TokenState> {
        let verifier = self
            .config
            .key_value_store
            .get(KEY_CODE_VERIFIER)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .map(PkceVerifier::from_stored)
            .ok_or(AuthError::MissingVerifier)?;

        let mut params = HashMap::new();
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", self.config.redirect_uri.as_str());
        params.insert("code_verifier", verifier.verifier());

        debug!("Exchanging authorization code for tokens");
        let response = self.post_token_form(&params).await?;
        let state = self.persist_token_response(response, None).await?;

        self.config
            .key_value_store
            .remove(KEY_CODE_VERIFIER)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!(
            expires_at = state.expires_at_epoch_ms,
            "Signed in successfully"
        );
        self.events
            .emit(CoreEvent::Auth(AuthEvent::SignedIn {
                expires_at_epoch_ms: state.expires_at_epoch_ms,
            }))
            .ok();

        Ok(state)
    }

    /// Return the cached access token if it is still valid.
    ///
    /// Validity is strict wall-clock comparison: a token whose stored
    /// expiry equals the current instant is expired. Never performs a
    /// refresh or any network call. Storage faults and unparseable
    /// expiry values are treated as "no valid token".
    pub async fn get_valid_token(&self) -> Option<String> {
        let kv = &self.config.key_value_store;

        let token = match kv.get(KEY_ACCESS_TOKEN).await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Failed to read access token");
                return None;
            }
        };

        let expiry = match kv.get(KEY_TOKEN_EXPIRY).await {
            Ok(Some(raw)) => match raw.parse::<i64>() {
                Ok(expiry) => expiry,
                Err(_) => {
                    debug!("Stored token expiry is not a valid timestamp");
                    return None;
                }
            },
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Failed to read token expiry");
                return None;
            }
        };

        let now = self.config.clock.unix_timestamp_millis();
        if now < expiry {
            Some(token)
        } else {
            None
        }
    }

    /// Exchange the stored refresh token for a fresh access token.
    ///
    /// Returns the new access token, or `None` when no refresh token is
    /// stored or the exchange fails for any reason (logged, and surfaced
    /// as a recoverable [`AuthEvent::AuthError`]). The stored refresh
    /// token is only replaced when the provider returns a new one.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Option<String> {
        match self.perform_refresh().await {
            Ok(Some(state)) => {
                self.events
                    .emit(CoreEvent::Auth(AuthEvent::TokenRefreshed {
                        expires_at_epoch_ms: state.expires_at_epoch_ms,
                    }))
                    .ok();
                Some(state.access_token)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                self.events
                    .emit(CoreEvent::Auth(AuthEvent::AuthError {
                        message: format!("Token refresh failed: {}", e),
                        recoverable: true,
                    }))
                    .ok();
                None
            }
        }
    }

    /// Return a usable access token, refreshing when the cached one has
    /// expired.
    ///
    /// This is the entry point remote calls should use before attaching a
    /// bearer token.
    pub async fn obtain_token(&self) -> Option<String> {
        if let Some(token) = self.get_valid_token().await {
            return Some(token);
        }
        self.refresh_token().await
    }

    /// Clear all persisted token state.
    ///
    /// Unconditional: keys that are already absent are not an error.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let kv = &self.config.key_value_store;
        for key in [KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRY] {
            kv.remove(key)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }

        tracing::info!("Signed out");
        self.events.emit(CoreEvent::Auth(AuthEvent::SignedOut)).ok();
        Ok(())
    }

    async fn perform_refresh(&self) -> Result<Option<TokenState>> {
        let refresh_token = match self
            .config
            .key_value_store
            .get(KEY_REFRESH_TOKEN)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
        {
            Some(token) => token,
            None => {
                debug!("No refresh token stored");
                return Ok(None);
            }
        };

        let mut params = HashMap::new();
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token.as_str());

        debug!("Refreshing access token");
        let response = self.post_token_form(&params).await?;
        let state = self
            .persist_token_response(response, Some(refresh_token))
            .await?;

        tracing::info!(
            expires_at = state.expires_at_epoch_ms,
            "Token refreshed successfully"
        );
        Ok(Some(state))
    }

    /// POST a form-encoded body to the token endpoint and parse the
    /// success payload.
    async fn post_token_form(&self, params: &HashMap<&str, &str>) -> Result<TokenResponse> {
        let encoded_body = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::Other(format!("Failed to encode token request: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        let response = self
            .config
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let description = response
                .json::<ProviderErrorBody>()
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .or_else(|| response.text().ok())
                .unwrap_or_else(|| "Unable to read error response".to_string());

            warn!(status = status, error = %description, "Token request rejected");
            return Err(AuthError::Provider {
                code: status,
                description,
            });
        }

        response
            .json()
            .map_err(|e| AuthError::Other(format!("Failed to parse token response: {}", e)))
    }

    /// Persist a token response, keeping `previous_refresh` when the
    /// provider did not rotate the refresh token.
    async fn persist_token_response(
        &self,
        response: TokenResponse,
        previous_refresh: Option<String>,
    ) -> Result<TokenState> {
        let now = self.config.clock.unix_timestamp_millis();
        let state = TokenState::new(
            response.access_token,
            response.refresh_token.or(previous_refresh),
            now,
            response.expires_in,
        );

        let kv = &self.config.key_value_store;
        kv.set(KEY_ACCESS_TOKEN, &state.access_token)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        if let Some(ref refresh) = state.refresh_token {
            kv.set(KEY_REFRESH_TOKEN, refresh)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }
        kv.set(KEY_TOKEN_EXPIRY, &state.expires_at_epoch_ms.to_string())
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(state)
    }
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600 // Default to 1 hour if not specified
}

/// Error payload from the token endpoint.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpClient, HttpResponse};
    use bridge_traits::storage::KeyValueStore;
    use bridge_traits::time::Clock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::{HashMap as StdHashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MemoryKv {
        data: Mutex<StdHashMap<String, String>>,
    }

    impl MemoryKv {
        fn new() -> Self {
            Self {
                data: Mutex::new(StdHashMap::new()),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryKv {
        async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> BridgeResult<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            self.data.lock().unwrap().clear();
            Ok(())
        }
    }

    /// HTTP stub that serves canned responses in order and counts calls.
    struct ScriptedHttp {
        responses: Mutex<VecDeque<HttpResponse>>,
        calls: AtomicUsize,
    }

    impl ScriptedHttp {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| BridgeError::OperationFailed("no scripted response".to_string()))
        }
    }

    struct FixedClock {
        now: DateTime<Utc>,
    }

    impl FixedClock {
        fn at_millis(epoch_ms: i64) -> Self {
            Self {
                now: Utc.timestamp_millis_opt(epoch_ms).unwrap(),
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.now
        }
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: StdHashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn manager_with(
        kv: Arc<MemoryKv>,
        http: Arc<ScriptedHttp>,
        now_epoch_ms: i64,
    ) -> AuthManager {
        let config = CoreConfig::builder()
            .client_id("test-client")
            .redirect_uri("http://localhost:3000/")
            .key_value_store(kv)
            .http_client(http)
            .clock(Arc::new(FixedClock::at_millis(now_epoch_ms)))
            .build()
            .expect("config should build");
        AuthManager::new(config, EventBus::default())
    }

    #[tokio::test]
    async fn begin_authorization_persists_verifier_and_builds_url() {
        let kv = Arc::new(MemoryKv::new());
        let http = Arc::new(ScriptedHttp::empty());
        let manager = manager_with(kv.clone(), http, 0);

        let url = manager.begin_authorization().await.unwrap();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("code_challenge="));
        assert!(url.contains("redirect_uri="));
        assert!(url.contains("scope="));

        let stored = kv.get(KEY_CODE_VERIFIER).await.unwrap();
        assert!(stored.is_some());
        assert_eq!(stored.unwrap().len(), 64);
    }

    #[tokio::test]
    async fn complete_without_verifier_makes_no_network_call() {
        let kv = Arc::new(MemoryKv::new());
        let http = Arc::new(ScriptedHttp::empty());
        let manager = manager_with(kv, http.clone(), 0);

        let result = manager.complete_authorization("some-code").await;

        assert!(matches!(result, Err(AuthError::MissingVerifier)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn complete_authorization_round_trip() {
        let now = 1_700_000_000_000;
        let kv = Arc::new(MemoryKv::new());
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            200,
            r#"{"access_token":"at-1","refresh_token":"rt-1","expires_in":3600}"#,
        )]));
        let manager = manager_with(kv.clone(), http.clone(), now);

        manager.begin_authorization().await.unwrap();
        let state = manager.complete_authorization("auth-code").await.unwrap();

        assert_eq!(state.access_token, "at-1");
        assert_eq!(state.refresh_token.as_deref(), Some("rt-1"));
        assert_eq!(state.expires_at_epoch_ms, now + 3_600_000);
        assert_eq!(http.call_count(), 1);

        // Token state persisted, verifier consumed
        assert_eq!(kv.get(KEY_ACCESS_TOKEN).await.unwrap().as_deref(), Some("at-1"));
        assert_eq!(
            kv.get(KEY_REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("rt-1")
        );
        assert_eq!(
            kv.get(KEY_TOKEN_EXPIRY).await.unwrap().as_deref(),
            Some((now + 3_600_000).to_string().as_str())
        );
        assert!(kv.get(KEY_CODE_VERIFIER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn complete_authorization_provider_error() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_CODE_VERIFIER, "stored-verifier").await.unwrap();
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#,
        )]));
        let manager = manager_with(kv.clone(), http, 0);

        let result = manager.complete_authorization("bad-code").await;

        match result {
            Err(AuthError::Provider { code, description }) => {
                assert_eq!(code, 400);
                assert_eq!(description, "Invalid authorization code");
            }
            other => panic!("expected Provider error, got {:?}", other.err()),
        }
        // No token state persisted on failure
        assert!(kv.get(KEY_ACCESS_TOKEN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_valid_token_boundaries() {
        let expiry = 1_700_000_000_000_i64;
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_ACCESS_TOKEN, "at-1").await.unwrap();
        kv.set(KEY_TOKEN_EXPIRY, &expiry.to_string()).await.unwrap();
        let http = Arc::new(ScriptedHttp::empty());

        // Strictly before expiry: valid
        let manager = manager_with(kv.clone(), http.clone(), expiry - 1);
        assert_eq!(manager.get_valid_token().await.as_deref(), Some("at-1"));

        // Exactly at expiry: expired
        let manager = manager_with(kv.clone(), http.clone(), expiry);
        assert!(manager.get_valid_token().await.is_none());

        // Past expiry: expired
        let manager = manager_with(kv, http, expiry + 1);
        assert!(manager.get_valid_token().await.is_none());
    }

    #[tokio::test]
    async fn get_valid_token_without_stored_token() {
        let kv = Arc::new(MemoryKv::new());
        let manager = manager_with(kv, Arc::new(ScriptedHttp::empty()), 0);
        assert!(manager.get_valid_token().await.is_none());
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_returns_none() {
        let kv = Arc::new(MemoryKv::new());
        let http = Arc::new(ScriptedHttp::empty());
        let manager = manager_with(kv, http.clone(), 0);

        assert!(manager.refresh_token().await.is_none());
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn refresh_keeps_old_refresh_token_when_not_rotated() {
        let now = 1_000_000;
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_REFRESH_TOKEN, "rt-old").await.unwrap();
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            200,
            r#"{"access_token":"at-2","expires_in":1800}"#,
        )]));
        let manager = manager_with(kv.clone(), http, now);

        let token = manager.refresh_token().await;

        assert_eq!(token.as_deref(), Some("at-2"));
        assert_eq!(
            kv.get(KEY_REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("rt-old")
        );
        assert_eq!(
            kv.get(KEY_TOKEN_EXPIRY).await.unwrap().as_deref(),
            Some((now + 1_800_000).to_string().as_str())
        );
    }

    #[tokio::test]
    async fn refresh_rotates_refresh_token_when_provided() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_REFRESH_TOKEN, "rt-old").await.unwrap();
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            200,
            r#"{"access_token":"at-2","refresh_token":"rt-new","expires_in":1800}"#,
        )]));
        let manager = manager_with(kv.clone(), http, 0);

        manager.refresh_token().await.unwrap();

        assert_eq!(
            kv.get(KEY_REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("rt-new")
        );
    }

    #[tokio::test]
    async fn refresh_failure_returns_none_without_retry() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_REFRESH_TOKEN, "rt-old").await.unwrap();
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            500,
            "server error",
        )]));
        let manager = manager_with(kv, http.clone(), 0);

        assert!(manager.refresh_token().await.is_none());
        assert_eq!(http.call_count(), 1); // single attempt, no retry loop
    }

    #[tokio::test]
    async fn obtain_token_refreshes_expired_token() {
        let now = 2_000_000;
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_ACCESS_TOKEN, "at-stale").await.unwrap();
        kv.set(KEY_TOKEN_EXPIRY, &(now - 1).to_string()).await.unwrap();
        kv.set(KEY_REFRESH_TOKEN, "rt-1").await.unwrap();
        let http = Arc::new(ScriptedHttp::new(vec![json_response(
            200,
            r#"{"access_token":"at-fresh","expires_in":3600}"#,
        )]));
        let manager = manager_with(kv, http, now);

        assert_eq!(manager.obtain_token().await.as_deref(), Some("at-fresh"));
    }

    #[tokio::test]
    async fn obtain_token_prefers_cached_token() {
        let now = 2_000_000;
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_ACCESS_TOKEN, "at-cached").await.unwrap();
        kv.set(KEY_TOKEN_EXPIRY, &(now + 60_000).to_string())
            .await
            .unwrap();
        let http = Arc::new(ScriptedHttp::empty());
        let manager = manager_with(kv, http.clone(), now);

        assert_eq!(manager.obtain_token().await.as_deref(), Some("at-cached"));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn logout_clears_all_token_keys() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(KEY_ACCESS_TOKEN, "at").await.unwrap();
        kv.set(KEY_REFRESH_TOKEN, "rt").await.unwrap();
        kv.set(KEY_TOKEN_EXPIRY, "123").await.unwrap();
        let manager = manager_with(kv.clone(), Arc::new(ScriptedHttp::empty()), 0);

        manager.logout().await.unwrap();

        assert!(kv.get(KEY_ACCESS_TOKEN).await.unwrap().is_none());
        assert!(kv.get(KEY_REFRESH_TOKEN).await.unwrap().is_none());
        assert!(kv.get(KEY_TOKEN_EXPIRY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let kv = Arc::new(MemoryKv::new());
        let manager = manager_with(kv, Arc::new(ScriptedHttp::empty()), 0);
        assert!(manager.logout().await.is_ok());
        assert!(manager.logout().await.is_ok());
    }

    #[test]
    fn redirect_uri_targets_callback_entry_point() {
        assert_eq!(
            redirect_uri_from_origin("http://localhost:3000", ""),
            "http://localhost:3000/callback"
        );
        assert_eq!(
            redirect_uri_from_origin("https://host.example/", "/juego_pakete"),
            "https://host.example/juego_pakete/callback"
        );
    }
}
