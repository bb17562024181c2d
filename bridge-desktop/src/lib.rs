//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge
//! traits using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `KeyValueStore` as an in-memory map (the browser-local storage
//!   stand-in)
//!
//! The playback device bridge has no desktop implementation here; hosts
//! supply their own `PlayerDevice` wrapping the provider's embedded
//! player.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MemoryKeyValueStore, ReqwestHttpClient};
//! use core_runtime::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .client_id("client-id")
//!     .redirect_uri("http://localhost:3000/")
//!     .key_value_store(Arc::new(MemoryKeyValueStore::new()))
//!     .http_client(Arc::new(ReqwestHttpClient::new()))
//!     .build();
//! ```

mod http;
mod kv_store;

pub use http::ReqwestHttpClient;
pub use kv_store::MemoryKeyValueStore;
