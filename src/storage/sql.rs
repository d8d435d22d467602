use chrono::Utc;
use sqlx::{AnyPool, FromRow};

use super::Store;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS paste (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    expires_at BIGINT
)";

#[derive(FromRow)]
struct StoredValue {
    value: String,
}

/// Store backed by an SQL database, expiring rows by an `expires_at` column.
#[derive(Clone)]
pub struct SqlStore {
    pool: AnyPool,
}

impl SqlStore {
    /// Connect to a database by URL, creating the table if needed.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Self::with_pool(AnyPool::connect(url).await?).await
    }

    pub async fn with_pool(pool: AnyPool) -> anyhow::Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn deadline_after(secs: u64) -> i64 {
    let millis = i64::try_from(secs).unwrap_or(i64::MAX).saturating_mul(1000);
    now_millis().saturating_add(millis)
}

impl Store for SqlStore {
    async fn get(&mut self, key: &str) -> crate::ApiResult<Option<String>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, StoredValue>(
            "SELECT value FROM paste WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(now_millis())
        .fetch_optional(&mut conn)
        .await?;
        Ok(row.map(|row| row.value))
    }

    async fn put(
        &mut self,
        key: &str,
        value: String,
        expire_after: Option<u64>,
    ) -> crate::ApiResult<()> {
        let expires_at = expire_after.map(deadline_after);

        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "INSERT INTO paste (key, value, expires_at) VALUES (?, ?, ?) ON CONFLICT (key) DO \
             UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    async fn purge_expired(&mut self) -> crate::ApiResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let result =
            sqlx::query("DELETE FROM paste WHERE expires_at IS NOT NULL AND expires_at <= ?")
                .bind(now_millis())
                .execute(&mut conn)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::any::AnyPoolOptions;

    use super::*;

    async fn store() -> SqlStore {
        // a single connection, so every query sees the same in-memory database
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqlStore::with_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn round_trips_values() {
        let mut store = store().await;
        assert_eq!(store.get("abcd").await.unwrap(), None);

        store.put("abcd", "hello".into(), None).await.unwrap();
        assert_eq!(store.get("abcd").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn second_put_wins() {
        let mut store = store().await;
        store.put("abcd", "first".into(), None).await.unwrap();
        store.put("abcd", "second".into(), Some(3600)).await.unwrap();
        assert_eq!(store.get("abcd").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn expired_rows_are_hidden_and_purged() {
        let mut store = store().await;
        store.put("live", "v".into(), Some(3600)).await.unwrap();
        store.put("forever", "v".into(), None).await.unwrap();

        // backdate a row past its deadline
        sqlx::query("INSERT INTO paste (key, value, expires_at) VALUES (?, ?, ?)")
            .bind("dead")
            .bind("v")
            .bind(now_millis() - 1000)
            .execute(&store.pool)
            .await
            .unwrap();

        assert_eq!(store.get("dead").await.unwrap(), None);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.get("live").await.unwrap().is_some());
        assert!(store.get("forever").await.unwrap().is_some());
    }
}
