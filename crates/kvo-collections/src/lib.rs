//! Typed collections over a key-value store.
//!
//! [`List`] stores an ordered sequence of `T` as a store list; [`Hash`]
//! exposes a store hash field by field. Elements of a list pass through a
//! [`Codec`] on every read and write, JSON unless configured otherwise.
//!
//! # Modules
//!
//! - [`list`] — [`List`], reads, appends and the copy/replace transform engine
//! - [`hash`] — [`Hash`], one method per hash command
//! - [`mode`] — [`TransformMode`]
//! - [`keys`] — generated keys for transform results
//! - [`error`] — [`CollectionError`]

pub mod error;
pub mod hash;
pub mod keys;
pub mod list;
pub mod mode;

#[cfg(test)]
mod testing;

pub use error::{CollectionError, Result};
pub use hash::Hash;
pub use keys::temp_key;
pub use list::List;
pub use mode::TransformMode;

pub use kvo_codec::{Codec, CodecError};
