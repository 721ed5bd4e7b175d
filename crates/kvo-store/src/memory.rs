//! In-memory store backend.
//!
//! [`InMemoryStore`] behaves like a single connection to a Redis-compatible
//! server whose data lives in process memory. It implements every command of
//! [`KeyValueStore`] with the server's semantics, including `LPUSH` head
//! insertion, negative range offsets, `RENAME` carrying the TTL, and lazy
//! expiry. Data is lost when the store is dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// A stored value. Lists and hashes never share a key.
#[derive(Clone, Debug)]
enum Value {
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

#[derive(Clone, Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// One logical database.
#[derive(Debug, Default)]
struct Database {
    entries: HashMap<String, Entry>,
}

impl Database {
    /// Entry for `key` unless it is absent or past its TTL.
    fn live(&self, key: &str) -> Option<&Entry> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
    }

    /// Drop `key` if its TTL has elapsed. Called before every write.
    fn evict_expired(&mut self, key: &str) {
        let now = Instant::now();
        if self.entries.get(key).is_some_and(|e| e.is_expired(now)) {
            self.entries.remove(key);
        }
    }

    fn list(&self, key: &str) -> StoreResult<Option<&VecDeque<String>>> {
        match self.live(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::List(list)) => Ok(Some(list)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn list_or_create(&mut self, key: &str) -> StoreResult<&mut VecDeque<String>> {
        self.evict_expired(key);
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::List(VecDeque::new())));
        match &mut entry.value {
            Value::List(list) => Ok(list),
            Value::Hash(_) => Err(wrong_type(key)),
        }
    }

    fn hash(&self, key: &str) -> StoreResult<Option<&HashMap<String, String>>> {
        match self.live(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(Some(hash)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn hash_or_create(&mut self, key: &str) -> StoreResult<&mut HashMap<String, String>> {
        self.evict_expired(key);
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::Hash(HashMap::new())));
        match &mut entry.value {
            Value::Hash(hash) => Ok(hash),
            Value::List(_) => Err(wrong_type(key)),
        }
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
    }
}

/// Resolve a possibly negative index against a length.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let idx = if index < 0 { len + index } else { index };
    (0..len).contains(&idx).then_some(idx as usize)
}

/// Clamp an inclusive `start..=stop` range the way `LRANGE` does.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start >= len || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// In-memory, single-connection key-value store.
///
/// All databases live behind one `RwLock`; every command takes the lock once,
/// so each command is atomic with respect to every other. The selected
/// database is connection state shared by all clones of the `Arc` holding
/// this store, exactly like `SELECT` on a shared connection.
pub struct InMemoryStore {
    databases: RwLock<Vec<Database>>,
    selected: AtomicU32,
}

impl InMemoryStore {
    /// Create a store with the default number of databases.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store from explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let databases = (0..config.databases.max(1))
            .map(|_| Database::default())
            .collect();
        Self {
            databases: RwLock::new(databases),
            selected: AtomicU32::new(0),
        }
    }

    /// Index of the currently selected database.
    pub fn selected_database(&self) -> u32 {
        self.selected.load(Ordering::Acquire)
    }

    /// Live keys in the selected database starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.read_db(|db| {
            let now = Instant::now();
            let mut keys: Vec<String> = db
                .entries
                .iter()
                .filter(|(k, e)| k.starts_with(prefix) && !e.is_expired(now))
                .map(|(k, _)| k.clone())
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    /// Number of live keys in the selected database.
    pub fn key_count(&self) -> StoreResult<usize> {
        self.keys_with_prefix("").map(|keys| keys.len())
    }

    fn read_db<R>(&self, f: impl FnOnce(&Database) -> StoreResult<R>) -> StoreResult<R> {
        let dbs = self
            .databases
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let index = self.selected_database();
        let db = dbs
            .get(index as usize)
            .ok_or(StoreError::InvalidDatabase(index))?;
        f(db)
    }

    fn write_db<R>(&self, f: impl FnOnce(&mut Database) -> StoreResult<R>) -> StoreResult<R> {
        let mut dbs = self
            .databases
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let index = self.selected_database();
        let db = dbs
            .get_mut(index as usize)
            .ok_or(StoreError::InvalidDatabase(index))?;
        f(db)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("selected", &self.selected_database())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn select(&self, db: u32) -> StoreResult<()> {
        let count = self
            .databases
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .len();
        if db as usize >= count {
            return Err(StoreError::InvalidDatabase(db));
        }
        self.selected.store(db, Ordering::Release);
        debug!(db, "selected database");
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        self.write_db(|db| {
            db.evict_expired(key);
            Ok(db.entries.remove(key).is_some())
        })
    }

    async fn rename(&self, from: &str, to: &str) -> StoreResult<()> {
        self.write_db(|db| {
            db.evict_expired(from);
            if !db.entries.contains_key(from) {
                return Err(StoreError::NoSuchKey {
                    key: from.to_string(),
                });
            }
            if from == to {
                return Ok(());
            }
            if let Some(entry) = db.entries.remove(from) {
                db.entries.insert(to.to_string(), entry);
            }
            Ok(())
        })
    }

    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool> {
        let deadline = if seconds > 0 {
            let at = Instant::now()
                .checked_add(Duration::from_secs(seconds as u64))
                .ok_or_else(|| StoreError::InvalidExpireTime {
                    key: key.to_string(),
                    seconds,
                })?;
            Some(at)
        } else {
            None
        };
        self.write_db(|db| {
            db.evict_expired(key);
            let Some(deadline) = deadline else {
                return Ok(db.entries.remove(key).is_some());
            };
            match db.entries.get_mut(key) {
                Some(entry) => {
                    entry.expires_at = Some(deadline);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    async fn llen(&self, key: &str) -> StoreResult<u64> {
        self.read_db(|db| Ok(db.list(key)?.map_or(0, |list| list.len() as u64)))
    }

    async fn lindex(&self, key: &str, index: i64) -> StoreResult<Option<String>> {
        self.read_db(|db| {
            let Some(list) = db.list(key)? else {
                return Ok(None);
            };
            Ok(resolve_index(list.len(), index).and_then(|i| list.get(i).cloned()))
        })
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.read_db(|db| {
            let Some(list) = db.list(key)? else {
                return Ok(Vec::new());
            };
            Ok(match resolve_range(list.len(), start, stop) {
                Some((from, to)) => list.range(from..=to).cloned().collect(),
                None => Vec::new(),
            })
        })
    }

    async fn lpush(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        if values.is_empty() {
            return Err(StoreError::WrongArity { command: "lpush" });
        }
        self.write_db(|db| {
            let list = db.list_or_create(key)?;
            for value in values {
                list.push_front(value.clone());
            }
            Ok(list.len() as u64)
        })
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.read_db(|db| Ok(db.hash(key)?.and_then(|h| h.get(field).cloned())))
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.read_db(|db| Ok(db.hash(key)?.cloned().unwrap_or_default()))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        self.write_db(|db| {
            let hash = db.hash_or_create(key)?;
            Ok(hash.insert(field.to_string(), value.to_string()).is_none())
        })
    }

    async fn hmget(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Err(StoreError::WrongArity { command: "hmget" });
        }
        self.read_db(|db| {
            let hash = db.hash(key)?;
            Ok(fields
                .iter()
                .map(|f| hash.and_then(|h| h.get(f).cloned()))
                .collect())
        })
    }

    async fn hmset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()> {
        if pairs.is_empty() {
            return Err(StoreError::WrongArity { command: "hmset" });
        }
        self.write_db(|db| {
            let hash = db.hash_or_create(key)?;
            for (field, value) in pairs {
                hash.insert(field.clone(), value.clone());
            }
            Ok(())
        })
    }

    async fn hdel(&self, key: &str, fields: &[String]) -> StoreResult<u64> {
        if fields.is_empty() {
            return Err(StoreError::WrongArity { command: "hdel" });
        }
        self.write_db(|db| {
            db.evict_expired(key);
            if db.hash(key)?.is_none() {
                return Ok(0);
            }
            let hash = db.hash_or_create(key)?;
            let removed = fields.iter().filter(|f| hash.remove(*f).is_some()).count();
            // An emptied hash stops existing.
            if hash.is_empty() {
                db.entries.remove(key);
            }
            Ok(removed as u64)
        })
    }

    async fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.read_db(|db| Ok(db.hash(key)?.is_some_and(|h| h.contains_key(field))))
    }

    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        self.write_db(|db| {
            let hash = db.hash_or_create(key)?;
            let current = match hash.get(field) {
                Some(raw) => raw.parse::<i64>().map_err(|_| StoreError::NotAnInteger {
                    key: key.to_string(),
                    field: field.to_string(),
                })?,
                None => 0,
            };
            let next = current
                .checked_add(delta)
                .ok_or_else(|| StoreError::IncrementOverflow {
                    key: key.to_string(),
                    field: field.to_string(),
                })?;
            hash.insert(field.to_string(), next.to_string());
            Ok(next)
        })
    }

    async fn hincrbyfloat(&self, key: &str, field: &str, delta: f64) -> StoreResult<f64> {
        let not_a_float = || StoreError::NotAFloat {
            key: key.to_string(),
            field: field.to_string(),
        };
        if !delta.is_finite() {
            return Err(not_a_float());
        }
        self.write_db(|db| {
            let hash = db.hash_or_create(key)?;
            let current = match hash.get(field) {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(not_a_float)?,
                None => 0.0,
            };
            let next = current + delta;
            if !next.is_finite() {
                return Err(not_a_float());
            }
            // Shortest round-trip decimal, never exponent form. The server
            // computes in long double, so the last digits of a value like
            // `0.1 + 0.2` can differ from what it would store.
            hash.insert(field.to_string(), next.to_string());
            Ok(next)
        })
    }

    async fn hlen(&self, key: &str) -> StoreResult<u64> {
        self.read_db(|db| Ok(db.hash(key)?.map_or(0, |h| h.len() as u64)))
    }

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        self.read_db(|db| Ok(db.hash(key)?.map_or_else(Vec::new, |h| h.keys().cloned().collect())))
    }
}
