use std::collections::HashMap;
use std::sync::Arc;

use kvo_store::KeyValueStore;

use crate::error::Result;

/// A field map stored as a hash under one key.
///
/// Every method issues exactly one store command and returns its reply.
/// Values are plain text; nothing is encoded or checked client-side.
#[derive(Clone)]
pub struct Hash {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl Hash {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remove one or more fields. Returns how many existed.
    pub async fn delete(&self, fields: &[&str]) -> Result<u64> {
        Ok(self.store.hdel(&self.key, &owned(fields)).await?)
    }

    pub async fn exists(&self, field: &str) -> Result<bool> {
        Ok(self.store.hexists(&self.key, field).await?)
    }

    /// Expire the whole hash after `seconds`. Returns `false` if the hash
    /// does not exist.
    pub async fn expire(&self, seconds: i64) -> Result<bool> {
        Ok(self.store.expire(&self.key, seconds).await?)
    }

    pub async fn get(&self, field: &str) -> Result<Option<String>> {
        Ok(self.store.hget(&self.key, field).await?)
    }

    pub async fn get_all(&self) -> Result<HashMap<String, String>> {
        Ok(self.store.hgetall(&self.key).await?)
    }

    /// Increment an integer field by one.
    pub async fn increment(&self, field: &str) -> Result<i64> {
        self.increment_by(field, 1).await
    }

    pub async fn increment_by(&self, field: &str, delta: i64) -> Result<i64> {
        Ok(self.store.hincrby(&self.key, field, delta).await?)
    }

    pub async fn increment_by_float(&self, field: &str, delta: f64) -> Result<f64> {
        Ok(self.store.hincrbyfloat(&self.key, field, delta).await?)
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.store.hkeys(&self.key).await?)
    }

    /// Number of fields.
    pub async fn length(&self) -> Result<u64> {
        Ok(self.store.hlen(&self.key).await?)
    }

    /// Values of several fields, `None` where a field is absent.
    pub async fn mget(&self, fields: &[&str]) -> Result<Vec<Option<String>>> {
        Ok(self.store.hmget(&self.key, &owned(fields)).await?)
    }

    /// Set several fields in one command.
    pub async fn mset<I, K, V>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(field, value)| (field.into(), value.to_string()))
            .collect();
        Ok(self.store.hmset(&self.key, &pairs).await?)
    }

    /// Set one field. Returns `true` if the field did not exist before.
    pub async fn set(&self, field: &str, value: impl ToString) -> Result<bool> {
        Ok(self
            .store
            .hset(&self.key, field, &value.to_string())
            .await?)
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hash").field("key", &self.key).finish_non_exhaustive()
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}
