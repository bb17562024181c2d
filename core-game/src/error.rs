//! Error types for the game crate.

use thiserror::Error;

/// Errors produced by game control and catalog operations.
///
/// Validation errors (`NoActivePlayback`, `InvalidRange`) are recovered
/// locally by the caller and surfaced to the user as messages on the
/// event bus, never as panics.
#[derive(Error, Debug)]
pub enum GameError {
    /// A round cannot start unless a track is actively playing.
    #[error("No active playback: play a track first")]
    NoActivePlayback,

    /// The pause window is empty: `min_seconds` must be strictly less
    /// than `max_seconds`.
    #[error("Invalid pause range: min ({min}s) must be less than max ({max}s)")]
    InvalidRange {
        /// Requested minimum, in seconds
        min: u64,
        /// Requested maximum, in seconds
        max: u64,
    },

    /// No playback device handle is attached, or the device rejected a
    /// transport command.
    #[error("Playback device is not ready")]
    PlayerNotReady,

    /// No access token could be obtained for a remote call.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The account cannot use the playback device (premium required).
    #[error("Account cannot use playback device: {0}")]
    DeviceAccount(String),

    /// The playback device reported an invalid token.
    #[error("Playback device authentication failed: {0}")]
    DeviceAuth(String),

    /// A catalog or playback command call failed remotely.
    #[error("Remote call failed: {0}")]
    Remote(String),
}

/// Result type alias for game operations.
pub type Result<T> = std::result::Result<T, GameError>;
