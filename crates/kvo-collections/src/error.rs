//! Error types for collection operations.

use kvo_codec::CodecError;
use kvo_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reading, writing or transforming a collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A stored element could not be decoded. The whole read is abandoned.
    #[error("cannot decode element {index} of {key}: {source}")]
    Deserialization {
        key: String,
        index: i64,
        #[source]
        source: CodecError,
    },

    /// An element could not be encoded. Nothing was written.
    #[error("cannot encode element for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: CodecError,
    },

    /// No element at the requested index, or the key holds no list.
    #[error("no element at index {index} of {key}")]
    NotFound { key: String, index: i64 },

    /// A transform mode name was not recognised.
    #[error("invalid transform mode: {0}")]
    InvalidMode(String),

    /// The store rejected a command or the connection failed.
    #[error(transparent)]
    Transport(#[from] StoreError),
}

/// Convenience type alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
