use std::fmt::Display;

use thiserror::Error;

/// Errors raised while converting between elements and stored text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An element could not be turned into text.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Stored text could not be turned back into an element.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl CodecError {
    pub fn encode(reason: impl Display) -> Self {
        Self::Encode(reason.to_string())
    }

    pub fn decode(reason: impl Display) -> Self {
        Self::Decode(reason.to_string())
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
