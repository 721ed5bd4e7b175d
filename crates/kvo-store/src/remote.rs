//! Redis server backend.
//!
//! [`RedisStore`] sends each [`KeyValueStore`] command to a Redis-compatible
//! server as exactly one request over a multiplexed, auto-reconnecting
//! connection.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Cmd, ErrorKind, FromRedisValue, RedisError};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// A connection to a Redis server.
///
/// Clones share one connection. `SELECT` applies to that shared connection;
/// after a reconnect the database named in the connection URL is in effect
/// again.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a connection, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        debug!(url, "connected to redis");
        Ok(Self { conn })
    }

    /// Wrap a connection the caller already manages.
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    async fn query<T: FromRedisValue>(&self, cmd: &Cmd, key: &str) -> StoreResult<T> {
        let mut conn = self.conn.clone();
        cmd.query_async(&mut conn)
            .await
            .map_err(|e| map_error(e, key))
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Translate a server or transport error for a command on `key`.
fn map_error(err: RedisError, key: &str) -> StoreError {
    if err.code() == Some("WRONGTYPE") {
        return StoreError::WrongType {
            key: key.to_string(),
        };
    }
    if err.kind() == ErrorKind::ResponseError {
        let detail = err.detail().unwrap_or_default();
        if detail.starts_with("no such key") {
            return StoreError::NoSuchKey {
                key: key.to_string(),
            };
        }
    }
    StoreError::Connection(err.to_string())
}

fn ensure_args<T>(args: &[T], command: &'static str) -> StoreResult<()> {
    if args.is_empty() {
        return Err(StoreError::WrongArity { command });
    }
    Ok(())
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn select(&self, db: u32) -> StoreResult<()> {
        let mut cmd = redis::cmd("SELECT");
        cmd.arg(db);
        let mut conn = self.conn.clone();
        let reply: Result<(), RedisError> = cmd.query_async(&mut conn).await;
        reply.map_err(|e| match e.detail() {
            Some(detail) if detail.contains("out of range") => StoreError::InvalidDatabase(db),
            _ => StoreError::Connection(e.to_string()),
        })?;
        debug!(db, "selected database");
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        self.query(redis::cmd("DEL").arg(key), key).await
    }

    async fn rename(&self, from: &str, to: &str) -> StoreResult<()> {
        self.query(redis::cmd("RENAME").arg(from).arg(to), from).await
    }

    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| match e.detail() {
                Some(detail) if detail.starts_with("invalid expire time") => {
                    StoreError::InvalidExpireTime {
                        key: key.to_string(),
                        seconds,
                    }
                }
                _ => map_error(e, key),
            })
    }

    async fn llen(&self, key: &str) -> StoreResult<u64> {
        self.query(redis::cmd("LLEN").arg(key), key).await
    }

    async fn lindex(&self, key: &str, index: i64) -> StoreResult<Option<String>> {
        self.query(redis::cmd("LINDEX").arg(key).arg(index), key).await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.query(redis::cmd("LRANGE").arg(key).arg(start).arg(stop), key)
            .await
    }

    async fn lpush(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        ensure_args(values, "lpush")?;
        self.query(redis::cmd("LPUSH").arg(key).arg(values), key).await
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.query(redis::cmd("HGET").arg(key).arg(field), key).await
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.query(redis::cmd("HGETALL").arg(key), key).await
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        self.query(redis::cmd("HSET").arg(key).arg(field).arg(value), key)
            .await
    }

    async fn hmget(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        ensure_args(fields, "hmget")?;
        self.query(redis::cmd("HMGET").arg(key).arg(fields), key).await
    }

    async fn hmset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()> {
        ensure_args(pairs, "hmset")?;
        let mut cmd = redis::cmd("HMSET");
        cmd.arg(key);
        for (field, value) in pairs {
            cmd.arg(field).arg(value);
        }
        self.query(&cmd, key).await
    }

    async fn hdel(&self, key: &str, fields: &[String]) -> StoreResult<u64> {
        ensure_args(fields, "hdel")?;
        self.query(redis::cmd("HDEL").arg(key).arg(fields), key).await
    }

    async fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.query(redis::cmd("HEXISTS").arg(key).arg(field), key).await
    }

    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        self.query(redis::cmd("HINCRBY").arg(key).arg(field).arg(delta), key)
            .await
    }

    async fn hincrbyfloat(&self, key: &str, field: &str, delta: f64) -> StoreResult<f64> {
        self.query(
            redis::cmd("HINCRBYFLOAT").arg(key).arg(field).arg(delta),
            key,
        )
        .await
    }

    async fn hlen(&self, key: &str) -> StoreResult<u64> {
        self.query(redis::cmd("HLEN").arg(key), key).await
    }

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        self.query(redis::cmd("HKEYS").arg(key), key).await
    }
}
