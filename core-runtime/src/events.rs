//! # Event Bus System
//!
//! Provides an event-driven architecture for the game core using
//! `tokio::sync::broadcast`. Auth and game modules emit typed events; UI
//! layers subscribe and render them. User-facing messages travel as events
//! rather than thrown faults, so a failed validation never propagates as a
//! panic across the API surface.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, GameEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Game(GameEvent::Stopped))
//!     .ok();
//! ```
//!
//! ## Error Handling
//!
//! The bus uses `tokio::sync::broadcast`:
//! - `RecvError::Lagged(n)`: subscriber missed `n` events; non-fatal.
//! - `RecvError::Closed`: all senders dropped; treat as shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Authentication-related events
    Auth(AuthEvent),
    /// Game and playback events
    Game(GameEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Game(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Game(GameEvent::PositionChanged { .. }) => EventSeverity::Debug,
            CoreEvent::Game(GameEvent::Message { .. }) => EventSeverity::Info,
            CoreEvent::Game(GameEvent::Armed { .. })
            | CoreEvent::Game(GameEvent::Paused { .. })
            | CoreEvent::Game(GameEvent::Stopped) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// Events related to the auth token lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Authorization flow initiated; the host should navigate to the URL.
    AuthorizationStarted,
    /// Code exchange completed and tokens were persisted.
    SignedIn {
        /// Timestamp when the new access token expires (epoch milliseconds).
        expires_at_epoch_ms: i64,
    },
    /// A refresh produced a new access token.
    TokenRefreshed {
        /// Timestamp when the new access token expires (epoch milliseconds).
        expires_at_epoch_ms: i64,
    },
    /// All persisted token state was cleared.
    SignedOut,
    /// Authentication error occurred.
    AuthError {
        /// Human-readable error message.
        message: String,
        /// Whether a user-initiated retry may succeed.
        recoverable: bool,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::AuthorizationStarted => "Authorization flow started",
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::TokenRefreshed { .. } => "Token refreshed successfully",
            AuthEvent::SignedOut => "User signed out",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

/// Events related to the guessing game and playback display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GameEvent {
    /// The playback device came online.
    DeviceReady {
        /// Provider-assigned device identifier.
        device_id: String,
    },
    /// The playback device went offline.
    DeviceOffline,
    /// Playback of a selected track was initiated.
    TrackStarted {
        /// Provider track URI.
        uri: String,
    },
    /// A pause timer was armed.
    Armed {
        /// Track position (milliseconds) at which playback will pause.
        pause_at_ms: u64,
    },
    /// The scheduled pause fired and playback was paused.
    Paused,
    /// The game was stopped by the user.
    Stopped,
    /// Playback position sample for progress display.
    PositionChanged {
        /// Current position (milliseconds).
        position_ms: u64,
        /// Track duration (milliseconds).
        duration_ms: u64,
    },
    /// User-facing message (validation feedback, device errors).
    Message {
        /// Localizable message text.
        text: String,
    },
}

impl GameEvent {
    fn description(&self) -> &str {
        match self {
            GameEvent::DeviceReady { .. } => "Playback device ready",
            GameEvent::DeviceOffline => "Playback device offline",
            GameEvent::TrackStarted { .. } => "Track playback started",
            GameEvent::Armed { .. } => "Pause timer armed",
            GameEvent::Paused => "Playback paused by game",
            GameEvent::Stopped => "Game stopped",
            GameEvent::PositionChanged { .. } => "Playback position changed",
            GameEvent::Message { .. } => "User message",
        }
    }
}

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all
    /// future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
