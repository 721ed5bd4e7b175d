use std::path::Path;

use kvo_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a [`KvObjects`](crate::KvObjects) handle.
///
/// ```toml
/// database = 2
///
/// [store]
/// databases = 16
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectsConfig {
    /// Logical database selected when connecting.
    pub database: u32,
    /// Settings for the in-memory backend.
    pub store: StoreConfig,
}

impl ObjectsConfig {
    pub fn from_toml_str(raw: &str) -> SdkResult<Self> {
        toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
