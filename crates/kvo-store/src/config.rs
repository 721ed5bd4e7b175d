use serde::{Deserialize, Serialize};

/// Number of logical databases a store exposes when nothing else is configured.
pub const DEFAULT_DATABASES: u32 = 16;

/// Configuration for the in-memory backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of logical databases addressable with `SELECT`.
    pub databases: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            databases: DEFAULT_DATABASES,
        }
    }
}
