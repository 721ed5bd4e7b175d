use std::sync::Arc;

use kvo_codec::Codec;
use kvo_collections::{Hash, List};
use kvo_store::{InMemoryStore, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ObjectsConfig;
use crate::error::SdkResult;

/// Factory for typed collections on one shared store connection.
///
/// Collections created here borrow the connection through an `Arc`; opening
/// and closing it is the caller's business.
#[derive(Clone)]
pub struct KvObjects {
    store: Arc<dyn KeyValueStore>,
}

impl KvObjects {
    /// Wrap an existing connection without issuing any command.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Wrap a connection and select the configured database on it.
    pub async fn connect(store: Arc<dyn KeyValueStore>, config: &ObjectsConfig) -> SdkResult<Self> {
        let objects = Self::new(store);
        objects.database(config.database).await?;
        info!(database = config.database, "kvo connected");
        Ok(objects)
    }

    /// A fresh in-memory store, configured and connected.
    pub async fn in_memory(config: &ObjectsConfig) -> SdkResult<Self> {
        let store = Arc::new(InMemoryStore::with_config(config.store.clone()));
        Self::connect(store, config).await
    }

    /// Connect to a Redis server at `url` and select the configured database.
    #[cfg(feature = "redis")]
    pub async fn connect_redis(url: &str, config: &ObjectsConfig) -> SdkResult<Self> {
        let store = Arc::new(kvo_store::RedisStore::connect(url).await?);
        Self::connect(store, config).await
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Switch the shared connection to database `db`.
    ///
    /// This is connection state: every collection created from this factory
    /// (before or after the call) now addresses `db`.
    pub async fn database(&self, db: u32) -> SdkResult<()> {
        self.store.select(db).await?;
        debug!(db, "selected database");
        Ok(())
    }

    /// A JSON-encoded list bound to `key`.
    pub fn list<T>(&self, key: impl Into<String>) -> List<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        List::new(Arc::clone(&self.store), key)
    }

    pub fn list_with_codec<T>(&self, key: impl Into<String>, codec: Codec<T>) -> List<T> {
        List::with_codec(Arc::clone(&self.store), key, codec)
    }

    pub fn hash(&self, key: impl Into<String>) -> Hash {
        Hash::new(Arc::clone(&self.store), key)
    }
}

impl std::fmt::Debug for KvObjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvObjects").finish_non_exhaustive()
    }
}
