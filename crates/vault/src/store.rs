//! Key-value persistence for sealed credentials.

use std::{collections::HashMap, path::Path};

use {
    async_trait::async_trait,
    sqlx::{
        SqlitePool,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    },
    tokio::sync::RwLock,
};

use crate::error::VaultError;

/// Minimal string key-value store.
///
/// Values are opaque to the store; the vault only ever writes base64 blobs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, VaultError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), VaultError>;

    /// Delete `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), VaultError>;
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), VaultError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), VaultError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// SQLite-backed store using the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool. Migrations must already have run.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) a database file and run migrations.
    pub async fn open(path: &Path) -> Result<Self, VaultError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VaultError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        crate::run_migrations(&pool).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), "credential database opened");

        Ok(Self::new(pool))
    }

    /// In-memory database with migrations applied. Single connection so every
    /// query sees the same database.
    pub async fn in_memory() -> Result<Self, VaultError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), VaultError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), VaultError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("apiKey").await.unwrap(), None);

        store.set("apiKey", "first").await.unwrap();
        assert_eq!(store.get("apiKey").await.unwrap().as_deref(), Some("first"));

        store.set("apiKey", "second").await.unwrap();
        assert_eq!(store.get("apiKey").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.get("other").await.unwrap(), None);

        store.remove("apiKey").await.unwrap();
        assert_eq!(store.get("apiKey").await.unwrap(), None);

        // Removing twice is fine.
        store.remove("apiKey").await.unwrap();
    }

    #[tokio::test]
    async fn memory_store_semantics() {
        exercise(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn sqlite_store_semantics() {
        let store = SqliteStore::in_memory().await.unwrap();
        exercise(&store).await;
    }

    #[tokio::test]
    async fn sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("narrator.db");

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.set("apiKey", "blob").await.unwrap();
            store.pool.close().await;
        }

        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.get("apiKey").await.unwrap().as_deref(), Some("blob"));
    }

    #[tokio::test]
    async fn sqlite_store_over_caller_pool() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::run_migrations(&pool).await.unwrap();

        let store = SqliteStore::new(pool.clone());
        store.set("apiKey", "blob").await.unwrap();

        let raw: String = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = 'apiKey'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(raw, "blob");
    }
}
