// In-memory credential storage
// Backs tests and throwaway sessions; nothing survives the process

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CredentialStore;

/// Volatile credential store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ACCESS_TOKEN_KEY, USER_KEY};

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap(), None);

        store.set(ACCESS_TOKEN_KEY, "T1").await.unwrap();
        assert_eq!(
            store.get(ACCESS_TOKEN_KEY).await.unwrap(),
            Some("T1".to_string())
        );

        // Overwrite
        store.set(ACCESS_TOKEN_KEY, "T2").await.unwrap();
        assert_eq!(
            store.get(ACCESS_TOKEN_KEY).await.unwrap(),
            Some("T2".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_multiple_keys() {
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "T1").await.unwrap();
        store.set(USER_KEY, "{}").await.unwrap();

        store.remove(&[ACCESS_TOKEN_KEY, USER_KEY]).await.unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);

        // Removing absent keys is fine
        store.remove(&[ACCESS_TOKEN_KEY]).await.unwrap();
    }
}
