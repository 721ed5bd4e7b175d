use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreResult;

/// A connection to a Redis-compatible key-value store.
///
/// Each method issues exactly one command and resolves when its reply
/// arrives. Implementations must be shareable across tasks (`Send + Sync`);
/// callers hold them behind an `Arc` and never assume ownership of the
/// connection's lifecycle.
///
/// Index arguments follow the store's conventions: `0` is the head, negative
/// values count back from the tail (`-1` is the last element).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    // ---- Keyspace ----

    /// Switch this connection to logical database `db`.
    async fn select(&self, db: u32) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    async fn del(&self, key: &str) -> StoreResult<bool>;

    /// Atomically rename `from` to `to`, replacing any value already at `to`.
    ///
    /// Fails with `NoSuchKey` if `from` does not exist.
    async fn rename(&self, from: &str, to: &str) -> StoreResult<()>;

    /// Set a time-to-live on `key`. Returns `true` if the timeout was set,
    /// `false` if the key does not exist. A non-positive TTL deletes the key.
    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool>;

    // ---- Lists ----

    /// Length of the list at `key`; `0` if it does not exist.
    async fn llen(&self, key: &str) -> StoreResult<u64>;

    /// Element at `index`, or `None` if out of range or the key is missing.
    async fn lindex(&self, key: &str, index: i64) -> StoreResult<Option<String>>;

    /// Elements from `start` to `stop` inclusive, head to tail.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>>;

    /// Insert `values` at the head of the list, one after another, so the
    /// last value ends up first. Creates the key if absent. Returns the new
    /// length. An empty `values` slice is an arity error.
    async fn lpush(&self, key: &str, values: &[String]) -> StoreResult<u64>;

    // ---- Hashes ----

    /// Value of `field`, or `None`.
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Every field and value of the hash; empty if the key is missing.
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Set `field` to `value`. Returns `true` if the field is new.
    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<bool>;

    /// Values of `fields`, in order, `None` for absent fields.
    async fn hmget(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>>;

    /// Set several fields at once. An empty `pairs` slice is an arity error.
    async fn hmset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()>;

    /// Remove `fields`. Returns how many were present.
    async fn hdel(&self, key: &str, fields: &[String]) -> StoreResult<u64>;

    /// Whether `field` exists in the hash.
    async fn hexists(&self, key: &str, field: &str) -> StoreResult<bool>;

    /// Add `delta` to the integer in `field` (missing counts as `0`).
    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;

    /// Add `delta` to the float in `field` (missing counts as `0`).
    async fn hincrbyfloat(&self, key: &str, field: &str, delta: f64) -> StoreResult<f64>;

    /// Number of fields in the hash.
    async fn hlen(&self, key: &str) -> StoreResult<u64>;

    /// Every field name of the hash.
    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>>;
}
