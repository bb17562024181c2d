//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the game core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the auth and game modules
//! depend on. It establishes the logging conventions, the fail-fast
//! configuration surface, and the event broadcasting mechanism used to
//! surface state changes and user-facing messages.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use events::{AuthEvent, CoreEvent, EventBus, GameEvent};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
