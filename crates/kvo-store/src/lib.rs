//! Key-value store boundary for kvo.
//!
//! The typed collections in `kvo-collections` never talk to a server
//! directly. Every command they issue goes through the [`KeyValueStore`]
//! trait, which mirrors the list, hash and keyspace commands of a
//! Redis-compatible store.
//!
//! # Storage Backends
//!
//! - [`InMemoryStore`] -- single-connection, `HashMap`-based store for tests
//!   and embedding. It reproduces the command semantics the collections
//!   depend on, most importantly head insertion for `LPUSH`.
//! - `RedisStore` (feature `redis`) -- one request per command to a real
//!   server through the `redis` crate's connection manager.
//!
//! # Design Rules
//!
//! 1. One trait method per store command; no client-side composition.
//! 2. Every command is independently atomic. Nothing here spans commands.
//! 3. `SELECT` is connection state: it applies to all later commands.
//! 4. Errors are returned, never retried and never swallowed.

pub mod config;
pub mod error;
pub mod memory;
#[cfg(feature = "redis")]
pub mod remote;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
#[cfg(feature = "redis")]
pub use remote::RedisStore;
pub use traits::KeyValueStore;
