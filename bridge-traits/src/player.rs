//! Playback device bridge trait and supporting types.
//!
//! The playback device is owned by the streaming provider's embedded player,
//! not by this core. The core issues transport commands and samples state;
//! the host forwards the device's push notifications as [`PlayerEvent`]
//! values. Nothing here decodes audio or manages the stream itself.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Track metadata as reported by the playback device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Provider track URI (e.g., `spotify:track:...`), when known.
    pub uri: Option<String>,
    /// Display title for the track.
    pub name: String,
    /// Artist display names, in provider order.
    pub artists: Vec<String>,
    /// URL of the largest album image, when available.
    pub album_image_url: Option<String>,
    /// Track duration in milliseconds.
    pub duration_ms: u64,
}

impl TrackInfo {
    /// Artist names joined for display ("A, B, C").
    pub fn artists_joined(&self) -> String {
        self.artists.join(", ")
    }
}

/// Point-in-time sample of the device's transport state.
///
/// Produced by the device on every state change and by periodic polling.
/// The core treats this as a read-only external fact; it never mutates or
/// corrects a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Whether the transport is currently paused.
    pub is_paused: bool,
    /// Playback position in milliseconds at sample time.
    pub position_ms: u64,
    /// The track loaded in the transport.
    pub track: TrackInfo,
}

impl PlaybackSnapshot {
    /// Convenience check for "actively playing".
    pub fn is_playing(&self) -> bool {
        !self.is_paused
    }
}

/// Push notifications emitted by the playback device.
///
/// The host registers listeners on the provider SDK and forwards each
/// callback as one of these variants. Consumers must tolerate
/// `StateChanged(None)` (the device can momentarily report no state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// The device came online and can accept playback transfers.
    Ready {
        /// Provider-assigned device identifier.
        device_id: String,
    },
    /// The device went offline.
    NotReady {
        /// Identifier of the device that went offline.
        device_id: String,
    },
    /// Transport state changed (play/pause/seek/track change).
    StateChanged(Option<PlaybackSnapshot>),
    /// The embedded player failed to initialize.
    InitializationError { message: String },
    /// The device's own token became invalid. Continued operation without
    /// valid auth is meaningless; consumers force a logout.
    AuthenticationError { message: String },
    /// The account cannot use the embedded player (e.g., premium required).
    AccountError { message: String },
}

/// Transport control surface of the externally-owned playback device.
///
/// All commands are asynchronous and may be issued while the device is
/// still connecting; implementations should fail with a descriptive
/// `BridgeError` rather than block. A command issued on a stale or
/// disconnected handle is not guaranteed to take effect.
#[async_trait::async_trait]
pub trait PlayerDevice: Send + Sync {
    /// Connect the device to the provider. Returns `true` on success.
    async fn connect(&self) -> Result<bool>;

    /// Disconnect and release the device.
    async fn disconnect(&self);

    /// Pause the transport.
    async fn pause(&self) -> Result<()>;

    /// Resume the transport.
    async fn resume(&self) -> Result<()>;

    /// Toggle between playing and paused.
    async fn toggle_play(&self) -> Result<()>;

    /// Seek to an absolute position in milliseconds.
    async fn seek(&self, position_ms: u64) -> Result<()>;

    /// Sample the current transport state.
    ///
    /// Returns `Ok(None)` when the device has no active playback context.
    async fn current_state(&self) -> Result<Option<PlaybackSnapshot>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> TrackInfo {
        TrackInfo {
            uri: Some("spotify:track:123".to_string()),
            name: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
            album_image_url: None,
            duration_ms: 180_000,
        }
    }

    #[test]
    fn artists_joined_for_display() {
        assert_eq!(sample_track().artists_joined(), "A, B");
    }

    #[test]
    fn snapshot_playing_check() {
        let snapshot = PlaybackSnapshot {
            is_paused: false,
            position_ms: 1500,
            track: sample_track(),
        };
        assert!(snapshot.is_playing());
    }

    #[test]
    fn player_event_serialization_round_trip() {
        let event = PlayerEvent::Ready {
            device_id: "device-1".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
