use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::Store;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn get(&mut self, key: &str) -> crate::ApiResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn put(
        &mut self,
        key: &str,
        value: String,
        expire_after: Option<u64>,
    ) -> crate::ApiResult<()> {
        // a deadline past what Instant can hold is as good as never
        let expires_at = expire_after
            .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs)));
        self.entries
            .write()
            .await
            .insert(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }

    async fn purge_expired(&mut self) -> crate::ApiResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok((before - entries.len()) as u64)
    }
}
