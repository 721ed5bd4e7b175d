use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollectionError;

/// Where the result of a `map` or `filter` is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Write the result under a freshly generated key; the source is untouched.
    #[default]
    Copy,
    /// Populate a temporary key, delete the source, then rename the temporary
    /// key onto the source key.
    Replace,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

impl FromStr for TransformMode {
    type Err = CollectionError;

    /// Accepts `copy`, `replace` and the older `overwrite` spelling of
    /// replace, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(Self::Copy),
            "replace" | "overwrite" => Ok(Self::Replace),
            _ => Err(CollectionError::InvalidMode(s.to_string())),
        }
    }
}
