//! Track search and playback-start calls against the provider's Web API.
//!
//! Every call obtains a bearer token through the auth manager first
//! (refreshing when the cached token has expired) and fails with
//! [`GameError::NotAuthenticated`] when none can be produced. The facade
//! surfaces that as a user message rather than a panic.

use crate::error::{GameError, Result};
use bridge_traits::http::{HttpMethod, HttpRequest};
use core_auth::AuthManager;
use core_runtime::CoreConfig;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A search result shaped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackHit {
    /// Provider track URI, used to start playback
    pub uri: String,
    /// Track title
    pub name: String,
    /// Artist names joined for display ("A, B, C")
    pub artists: String,
    /// Thumbnail album image URL, when available
    pub image_url: Option<String>,
}

/// Client for catalog search and playback command endpoints.
pub struct CatalogClient {
    config: CoreConfig,
    auth: Arc<AuthManager>,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CoreConfig, auth: Arc<AuthManager>) -> Self {
        Self { config, auth }
    }

    /// Search the catalog for tracks matching `query`.
    ///
    /// Issues `GET {api_base}/search?q=..&type=track&limit=..` with a
    /// bearer token and maps the payload to display-friendly
    /// [`TrackHit`]s.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotAuthenticated`] when no token can be obtained
    /// - [`GameError::Remote`] on transport failure or non-success status
    #[instrument(skip(self))]
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackHit>> {
        let token = self
            .auth
            .obtain_token()
            .await
            .ok_or(GameError::NotAuthenticated)?;

        let limit = self.config.search_limit.to_string();
        let query_string = serde_urlencoded::to_string([
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
        ])
        .map_err(|e| GameError::Remote(format!("Failed to encode search query: {}", e)))?;

        let url = format!("{}/search?{}", self.config.api_base_url, query_string);
        let request = HttpRequest::new(HttpMethod::Get, url).bearer_token(token);

        let response = self
            .config
            .http_client
            .execute(request)
            .await
            .map_err(|e| GameError::Remote(e.to_string()))?;

        if !response.is_success() {
            return Err(GameError::Remote(format!(
                "Search returned {}",
                response.status
            )));
        }

        let payload: SearchResponse = response
            .json()
            .map_err(|e| GameError::Remote(format!("Failed to parse search response: {}", e)))?;

        let hits: Vec<TrackHit> = payload
            .tracks
            .items
            .into_iter()
            .map(TrackHit::from)
            .collect();

        debug!(count = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Start playback of `uri` on the given device.
    ///
    /// Issues `PUT {api_base}/me/player/play?device_id=..` with a
    /// `{ "uris": [uri] }` body.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotAuthenticated`] when no token can be obtained
    /// - [`GameError::Remote`] on transport failure or non-success status
    #[instrument(skip(self))]
    pub async fn play_track(&self, uri: &str, device_id: &str) -> Result<()> {
        let token = self
            .auth
            .obtain_token()
            .await
            .ok_or(GameError::NotAuthenticated)?;

        let query_string = serde_urlencoded::to_string([("device_id", device_id)])
            .map_err(|e| GameError::Remote(format!("Failed to encode device id: {}", e)))?;

        let url = format!("{}/me/player/play?{}", self.config.api_base_url, query_string);
        let request = HttpRequest::new(HttpMethod::Put, url)
            .bearer_token(token)
            .json(&json!({ "uris": [uri] }))
            .map_err(|e| GameError::Remote(e.to_string()))?;

        let response = self
            .config
            .http_client
            .execute(request)
            .await
            .map_err(|e| GameError::Remote(e.to_string()))?;

        if !response.is_success() {
            return Err(GameError::Remote(format!(
                "Playback command returned {}",
                response.status
            )));
        }

        debug!("Playback started");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TracksPage,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<RawArtist>,
    album: RawAlbum,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

impl From<RawTrack> for TrackHit {
    fn from(raw: RawTrack) -> Self {
        // Provider image lists run largest-first; index 2 is the thumbnail
        let image_url = raw
            .album
            .images
            .get(2)
            .or_else(|| raw.album.images.last())
            .map(|image| image.url.clone());

        Self {
            uri: raw.uri,
            name: raw.name,
            artists: raw
                .artists
                .into_iter()
                .map(|artist| artist.name)
                .collect::<Vec<_>>()
                .join(", "),
            image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpClient, HttpResponse};
    use bridge_traits::storage::KeyValueStore;
    use bridge_traits::time::Clock;
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};
    use core_auth::{KEY_ACCESS_TOKEN, KEY_TOKEN_EXPIRY};
    use core_runtime::EventBus;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    struct MemoryKv {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryKv {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
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

    /// Serves canned responses in order and records every request.
    struct RecordingHttp {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttp {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for RecordingHttp {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
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

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.now
        }
    }

    async fn catalog_with(
        responses: Vec<HttpResponse>,
        authenticated: bool,
    ) -> (CatalogClient, Arc<RecordingHttp>) {
        let now = 1_000_000_i64;
        let kv = Arc::new(MemoryKv::new());
        if authenticated {
            kv.set(KEY_ACCESS_TOKEN, "token-1").await.unwrap();
            kv.set(KEY_TOKEN_EXPIRY, &(now + 60_000).to_string())
                .await
                .unwrap();
        }
        let http = Arc::new(RecordingHttp::new(responses));
        let config = CoreConfig::builder()
            .client_id("test-client")
            .redirect_uri("http://localhost:3000/")
            .key_value_store(kv)
            .http_client(http.clone())
            .clock(Arc::new(FixedClock {
                now: Utc.timestamp_millis_opt(now).unwrap(),
            }))
            .build()
            .unwrap();
        let auth = Arc::new(AuthManager::new(config.clone(), EventBus::default()));
        (CatalogClient::new(config, auth), http)
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    const SEARCH_BODY: &str = r#"{
        "tracks": {
            "items": [
                {
                    "uri": "spotify:track:1",
                    "name": "First Song",
                    "artists": [{"name": "Alpha"}, {"name": "Beta"}],
                    "album": {
                        "images": [
                            {"url": "https://img/large"},
                            {"url": "https://img/medium"},
                            {"url": "https://img/small"}
                        ]
                    }
                },
                {
                    "uri": "spotify:track:2",
                    "name": "Second Song",
                    "artists": [{"name": "Gamma"}],
                    "album": {"images": [{"url": "https://img/only"}]}
                }
            ]
        }
    }"#;

    #[tokio::test]
    async fn search_maps_payload_to_hits() {
        let (catalog, http) = catalog_with(vec![json_response(200, SEARCH_BODY)], true).await;

        let hits = catalog.search_tracks("first").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].uri, "spotify:track:1");
        assert_eq!(hits[0].artists, "Alpha, Beta");
        assert_eq!(hits[0].image_url.as_deref(), Some("https://img/small"));
        // Falls back to the last image when no thumbnail index exists
        assert_eq!(hits[1].image_url.as_deref(), Some("https://img/only"));

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("/search?"));
        assert!(requests[0].url.contains("q=first"));
        assert!(requests[0].url.contains("type=track"));
        assert!(requests[0].url.contains("limit=10"));
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer token-1".to_string())
        );
    }

    #[tokio::test]
    async fn search_without_token_fails_before_network() {
        let (catalog, http) = catalog_with(vec![], false).await;

        let result = catalog.search_tracks("anything").await;

        assert!(matches!(result, Err(GameError::NotAuthenticated)));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn search_remote_failure_is_reported() {
        let (catalog, _http) = catalog_with(vec![json_response(502, "bad gateway")], true).await;
        let result = catalog.search_tracks("q").await;
        assert!(matches!(result, Err(GameError::Remote(_))));
    }

    #[tokio::test]
    async fn play_track_issues_put_with_device_id() {
        let (catalog, http) = catalog_with(vec![json_response(204, "")], true).await;

        catalog
            .play_track("spotify:track:1", "device-7")
            .await
            .unwrap();

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert!(requests[0].url.contains("/me/player/play?device_id=device-7"));
        let body = requests[0].body.as_ref().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(parsed["uris"][0], "spotify:track:1");
    }

    #[tokio::test]
    async fn play_track_without_token_fails() {
        let (catalog, _http) = catalog_with(vec![], false).await;
        let result = catalog.play_track("spotify:track:1", "device-7").await;
        assert!(matches!(result, Err(GameError::NotAuthenticated)));
    }
}
