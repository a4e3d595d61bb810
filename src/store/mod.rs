// Credential storage
// The gateway and the auth flows touch credentials only through this contract

use anyhow::Result;
use async_trait::async_trait;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Store key for the short-lived access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Store key for the cached user profile blob
pub const USER_KEY: &str = "user";

/// Async key-value contract over the device's secure credential storage
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the given keys; missing keys are not an error
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}
