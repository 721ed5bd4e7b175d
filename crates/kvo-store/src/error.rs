/// Errors from store commands.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key exists but holds a different kind of value.
    #[error("WRONGTYPE operation against key {key} holding the wrong kind of value")]
    WrongType { key: String },

    /// A command that requires an existing key (e.g. `RENAME`) found none.
    #[error("no such key: {key}")]
    NoSuchKey { key: String },

    /// The command was issued with an invalid number of arguments.
    #[error("wrong number of arguments for '{command}' command")]
    WrongArity { command: &'static str },

    /// The hash field does not hold an integer.
    #[error("hash value is not an integer: {key}.{field}")]
    NotAnInteger { key: String, field: String },

    /// The hash field (or the increment) is not a finite float.
    #[error("hash value is not a valid float: {key}.{field}")]
    NotAFloat { key: String, field: String },

    /// Incrementing would overflow a 64-bit integer.
    #[error("increment or decrement would overflow: {key}.{field}")]
    IncrementOverflow { key: String, field: String },

    /// The TTL does not fit the backend's clock.
    #[error("invalid expire time for key {key}: {seconds}")]
    InvalidExpireTime { key: String, seconds: i64 },

    /// `SELECT` was asked for a database index outside the configured range.
    #[error("DB index is out of range: {0}")]
    InvalidDatabase(u32),

    /// The connection to the store failed or the command was rejected by the
    /// transport.
    #[error("connection error: {0}")]
    Connection(String),

    /// A backend lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
