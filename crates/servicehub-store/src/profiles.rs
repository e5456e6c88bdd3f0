use std::collections::HashMap;

use async_trait::async_trait;
use servicehub_core::{KeyValueStore, Result, UserProfile};
use tokio::sync::RwLock;
use tracing::debug;

/// Stand-in for the host device's key-value storage.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// Profile fields persisted as JSON under `profile:{user_id}`.
pub struct ProfileStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    fn key(user_id: &str) -> String {
        format!("profile:{user_id}")
    }

    pub async fn save(&self, profile: &UserProfile) -> Result<()> {
        let encoded = serde_json::to_string(profile)?;
        self.backend.set(&Self::key(&profile.user_id), encoded).await?;
        debug!(user_id = %profile.user_id, "profile saved");
        Ok(())
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<UserProfile>> {
        match self.backend.get(&Self::key(user_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn clear(&self, user_id: &str) -> Result<()> {
        self.backend.remove(&Self::key(user_id)).await
    }
}
