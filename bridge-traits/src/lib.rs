//! # Host Bridge Traits
//!
//! Capability contracts that must be implemented by each host environment.
//!
//! ## Overview
//!
//! This crate defines the contract between the game core and host-specific
//! implementations. Each trait represents a capability the core requires but
//! that is owned by the host: persistent key-value storage, HTTP transport,
//! the streaming provider's playback device, and a time source.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations (token exchange,
//!   catalog search, playback commands)
//! - [`KeyValueStore`](storage::KeyValueStore) - String-valued persistent
//!   storage (browser localStorage, config files, test doubles)
//! - [`PlayerDevice`](player::PlayerDevice) - The externally-owned playback
//!   transport plus its [`PlayerEvent`](player::PlayerEvent) notification
//!   stream
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert platform-specific errors to `BridgeError`
//! and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod error;
pub mod http;
pub mod player;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use player::{PlaybackSnapshot, PlayerDevice, PlayerEvent, TrackInfo};
pub use storage::KeyValueStore;
pub use time::{Clock, SystemClock};
