//! # Game Core
//!
//! The randomized-pause guessing game: rounds play a track from the
//! start, pause it at an unpredictable moment drawn from a configured
//! window, and resume for further rounds on demand. The playback device
//! is externally owned; this crate only issues transport commands,
//! samples positions, and reacts to device notifications.
//!
//! ## Architecture
//!
//! - [`session`]: the round state machine and the uniform pause draw
//! - [`controller`]: [`GameController`] owning the session, the device
//!   handle, the one-shot pause timer and the polling task
//! - [`catalog`]: track search and playback-start calls against the
//!   provider's Web API
//!
//! User-visible outcomes (round armed, paused, stopped, messages) travel
//! on the shared [`EventBus`](core_runtime::EventBus); validation errors
//! come back as typed [`GameError`]s for the facade to render.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod session;

pub use catalog::{CatalogClient, TrackHit};
pub use controller::GameController;
pub use error::{GameError, Result};
pub use session::{draw_pause_delay_ms, validate_range, GamePhase, GameSession};
