//! Fault injection for collection tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use kvo_store::{InMemoryStore, KeyValueStore, StoreError, StoreResult};

/// List and keyspace commands the collections issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Del,
    Rename,
    Llen,
    Lindex,
    Lrange,
    Lpush,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Self::Del => "del",
            Self::Rename => "rename",
            Self::Llen => "llen",
            Self::Lindex => "lindex",
            Self::Lrange => "lrange",
            Self::Lpush => "lpush",
        }
    }
}

/// An [`InMemoryStore`] that logs list commands and can fail the next
/// occurrence of one of them with a connection error.
#[derive(Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    fail_next: Mutex<Option<Command>>,
    log: Mutex<Vec<Command>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Fail the next `command` once.
    pub fn fail_on(&self, command: Command) {
        *self.fail_next.lock().unwrap() = Some(command);
    }

    pub fn log(&self) -> Vec<Command> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn issue(&self, command: Command) -> StoreResult<()> {
        self.log.lock().unwrap().push(command);
        let mut fail = self.fail_next.lock().unwrap();
        if *fail == Some(command) {
            *fail = None;
            return Err(StoreError::Connection(format!(
                "injected failure on {}",
                command.name()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
    async fn select(&self, db: u32) -> StoreResult<()> {
        self.inner.select(db).await
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        self.issue(Command::Del)?;
        self.inner.del(key).await
    }

    async fn rename(&self, from: &str, to: &str) -> StoreResult<()> {
        self.issue(Command::Rename)?;
        self.inner.rename(from, to).await
    }

    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool> {
        self.inner.expire(key, seconds).await
    }

    async fn llen(&self, key: &str) -> StoreResult<u64> {
        self.issue(Command::Llen)?;
        self.inner.llen(key).await
    }

    async fn lindex(&self, key: &str, index: i64) -> StoreResult<Option<String>> {
        self.issue(Command::Lindex)?;
        self.inner.lindex(key, index).await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.issue(Command::Lrange)?;
        self.inner.lrange(key, start, stop).await
    }

    async fn lpush(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        self.issue(Command::Lpush)?;
        self.inner.lpush(key, values).await
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.inner.hget(key, field).await
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.inner.hgetall(key).await
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        self.inner.hset(key, field, value).await
    }

    async fn hmget(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        self.inner.hmget(key, fields).await
    }

    async fn hmset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()> {
        self.inner.hmset(key, pairs).await
    }

    async fn hdel(&self, key: &str, fields: &[String]) -> StoreResult<u64> {
        self.inner.hdel(key, fields).await
    }

    async fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.inner.hexists(key, field).await
    }

    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        self.inner.hincrby(key, field, delta).await
    }

    async fn hincrbyfloat(&self, key: &str, field: &str, delta: f64) -> StoreResult<f64> {
        self.inner.hincrbyfloat(key, field, delta).await
    }

    async fn hlen(&self, key: &str) -> StoreResult<u64> {
        self.inner.hlen(key).await
    }

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        self.inner.hkeys(key).await
    }
}
