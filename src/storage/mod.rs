pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sql;

/// Key-value store holding serialized pastes.
///
/// Writes are last-writer-wins; nothing here makes a `get` followed by a
/// `put` atomic.
pub trait Store {
    /// Get a value by key, if present and not expired.
    async fn get(&mut self, key: &str) -> crate::ApiResult<Option<String>>;

    /// Put a value by key, replacing any previous one. The entry expires
    /// after `expire_after` seconds, or never when `None`.
    async fn put(&mut self, key: &str, value: String, expire_after: Option<u64>)
        -> crate::ApiResult<()>;

    /// Remove every expired entry, returning how many were removed.
    async fn purge_expired(&mut self) -> crate::ApiResult<u64>;
}

#[derive(Clone)]
pub enum AnyStore {
    Memory(memory::MemoryStore),
    #[cfg(feature = "sqlite")]
    Sql(sql::SqlStore),
}

impl Store for AnyStore {
    async fn get(&mut self, key: &str) -> crate::ApiResult<Option<String>> {
        match self {
            AnyStore::Memory(memory) => memory.get(key).await,
            #[cfg(feature = "sqlite")]
            AnyStore::Sql(sql) => sql.get(key).await,
        }
    }

    async fn put(
        &mut self,
        key: &str,
        value: String,
        expire_after: Option<u64>,
    ) -> crate::ApiResult<()> {
        match self {
            AnyStore::Memory(memory) => memory.put(key, value, expire_after).await,
            #[cfg(feature = "sqlite")]
            AnyStore::Sql(sql) => sql.put(key, value, expire_after).await,
        }
    }

    async fn purge_expired(&mut self) -> crate::ApiResult<u64> {
        match self {
            AnyStore::Memory(memory) => memory.purge_expired().await,
            #[cfg(feature = "sqlite")]
            AnyStore::Sql(sql) => sql.purge_expired().await,
        }
    }
}

impl From<memory::MemoryStore> for AnyStore {
    fn from(value: memory::MemoryStore) -> Self {
        AnyStore::Memory(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<sql::SqlStore> for AnyStore {
    fn from(value: sql::SqlStore) -> Self {
        AnyStore::Sql(value)
    }
}
