//! Serialization strategies for kvo collections.
//!
//! A store only holds text, so every typed collection carries a [`Codec`]:
//! an `encode` function turning an element into text and a `decode` function
//! turning stored text back into an element. JSON is the default; either half
//! can be replaced per collection instance.

pub mod codec;
pub mod error;

pub use codec::{Codec, DecodeFn, EncodeFn};
pub use error::{CodecError, CodecResult};
