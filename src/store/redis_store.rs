//! Redis Store Module
//!
//! [`KvStore`] over a Redis server through the `redis` crate's
//! [`ConnectionManager`], which reconnects on its own after failures.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use tracing::debug;

use super::{KvStore, StoreError, StoreResult};

// == Redis Store ==
/// Redis-backed key-value store.
pub struct RedisStore {
    client: Client,
    /// Set once `connect` succeeds
    connection: RwLock<Option<ConnectionManager>>,
}

impl RedisStore {
    /// Creates a store for the given `redis://` address without connecting.
    pub fn open(url: &str) -> StoreResult<Self> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            connection: RwLock::new(None),
        })
    }

    async fn connection(&self) -> StoreResult<ConnectionManager> {
        self.connection
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotConnected)
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn connect(&self) -> StoreResult<()> {
        let manager = ConnectionManager::new(self.client.clone()).await?;
        *self.connection.write().await = Some(manager);
        debug!("Redis connection established");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn auth(&self, password: &str) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("AUTH")
            .arg(password)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        let applied: bool = conn.expire(key, seconds).await?;
        Ok(applied)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        let mut conn = self.connection().await?;
        // Always MGET so a single key still yields an array reply
        let values = redis::cmd("MGET")
            .arg(keys)
            .query_async::<Vec<Option<String>>>(&mut conn)
            .await?;
        Ok(values)
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        let mut conn = self.connection().await?;
        let removed = redis::cmd("DEL")
            .arg(keys)
            .query_async::<u64>(&mut conn)
            .await?;
        Ok(removed)
    }
}
