//! High-level entry point for kvo.
//!
//! [`KvObjects`] owns nothing but a shared store handle. It selects the
//! logical database and hands out [`List`] and [`Hash`] values bound to keys
//! on that connection.

pub mod config;
pub mod error;
pub mod objects;

pub use config::ObjectsConfig;
pub use error::{SdkError, SdkResult};
pub use objects::KvObjects;

// Re-export key types
pub use kvo_codec::{Codec, CodecError};
pub use kvo_collections::{CollectionError, Hash, List, TransformMode};
pub use kvo_store::{InMemoryStore, KeyValueStore, StoreConfig, StoreError};
#[cfg(feature = "redis")]
pub use kvo_store::RedisStore;
