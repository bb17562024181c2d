//! Key-Value Storage Abstraction
//!
//! Provides a host-agnostic trait for string-valued persistent storage.
//! The auth layer keeps its entire persisted state (code verifier, token
//! fields) in this store, so swapping in a test double makes the whole
//! token lifecycle deterministic.

use async_trait::async_trait;

use crate::error::Result;

/// String-valued key-value storage trait
///
/// Abstracts the host's persistence mechanism:
/// - Web: localStorage
/// - Desktop: config files or OS-specific preferences
/// - Tests: in-memory map
///
/// All values are strings; callers are responsible for encoding anything
/// richer (the token expiry, for example, is stored as epoch milliseconds
/// rendered as a decimal string).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember(store: &dyn KeyValueStore) -> Result<()> {
///     store.set("access_token", "BQDe...").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous value under the same key
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key
    ///
    /// Deleting a key that doesn't exist is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists without retrieving it
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Clear all keys
    ///
    /// Use with caution! This will delete everything in the store.
    async fn clear_all(&self) -> Result<()>;
}
