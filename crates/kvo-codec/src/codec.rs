use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};

/// Turns an element into its stored text form.
pub type EncodeFn<T> = Arc<dyn Fn(&T) -> CodecResult<String> + Send + Sync>;

/// Turns stored text back into an element.
pub type DecodeFn<T> = Arc<dyn Fn(&str) -> CodecResult<T> + Send + Sync>;

/// A pair of text conversion functions for elements of type `T`.
///
/// Codecs are plain values: cloning one is cheap (both halves are
/// reference-counted) and replacing the codec on a collection only affects
/// that collection's later operations. Existing stored data is never
/// re-encoded.
pub struct Codec<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> Codec<T> {
    /// Build a codec from two functions.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&T) -> CodecResult<String> + Send + Sync + 'static,
        D: Fn(&str) -> CodecResult<T> + Send + Sync + 'static,
    {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Replace the encoding half, keeping the decoder.
    pub fn with_encoder<E>(mut self, encode: E) -> Self
    where
        E: Fn(&T) -> CodecResult<String> + Send + Sync + 'static,
    {
        self.encode = Arc::new(encode);
        self
    }

    /// Replace the decoding half, keeping the encoder.
    pub fn with_decoder<D>(mut self, decode: D) -> Self
    where
        D: Fn(&str) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.decode = Arc::new(decode);
        self
    }

    pub fn encode(&self, item: &T) -> CodecResult<String> {
        (self.encode)(item)
    }

    pub fn decode(&self, raw: &str) -> CodecResult<T> {
        (self.decode)(raw)
    }

    /// Encode every element, stopping at the first failure.
    pub fn encode_all(&self, items: &[T]) -> CodecResult<Vec<String>> {
        items.iter().map(|item| self.encode(item)).collect()
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Codec<T> {
    /// JSON text via `serde_json`. This is the default codec.
    pub fn json() -> Self {
        Self::new(
            |item: &T| serde_json::to_string(item).map_err(CodecError::encode),
            |raw: &str| serde_json::from_str(raw).map_err(CodecError::decode),
        )
    }
}

impl<T> Codec<T>
where
    T: Display + FromStr + 'static,
    T::Err: Display,
{
    /// The element's `Display` form, parsed back with `FromStr`.
    ///
    /// Useful for strings and numbers that should be readable by other
    /// clients of the store without JSON quoting.
    pub fn plain() -> Self {
        Self::new(
            |item: &T| Ok(item.to_string()),
            |raw: &str| raw.parse::<T>().map_err(CodecError::decode),
        )
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Default for Codec<T> {
    fn default() -> Self {
        Self::json()
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("element", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        name: String,
        done: bool,
    }

    #[test]
    fn json_codec_writes_compact_json() {
        let codec = Codec::<Task>::json();
        let task = Task {
            name: "ship".into(),
            done: false,
        };

        let raw = codec.encode(&task).unwrap();
        assert_eq!(raw, r#"{"name":"ship","done":false}"#);
        assert_eq!(codec.decode(&raw).unwrap(), task);
    }

    #[test]
    fn json_decode_failure_is_reported() {
        let codec = Codec::<u32>::default();
        let err = codec.decode("not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn plain_codec_stores_display_form() {
        let codec = Codec::<i64>::plain();
        assert_eq!(codec.encode(&-42).unwrap(), "-42");
        assert_eq!(codec.decode("17").unwrap(), 17);
        assert!(codec.decode("seventeen").is_err());

        let strings = Codec::<String>::plain();
        assert_eq!(strings.encode(&"hello".to_string()).unwrap(), "hello");
    }

    #[test]
    fn replacing_one_half_keeps_the_other() {
        let codec = Codec::<u32>::json()
            .with_encoder(|n: &u32| Ok(format!("#{n}")))
            .with_decoder(|raw: &str| {
                raw.trim_start_matches('#')
                    .parse()
                    .map_err(CodecError::decode)
            });

        assert_eq!(codec.encode(&7).unwrap(), "#7");
        assert_eq!(codec.decode("#7").unwrap(), 7);

        let json_decode = Codec::<u32>::json().with_encoder(|n: &u32| Ok(n.to_string()));
        assert_eq!(json_decode.decode("9").unwrap(), 9);
    }

    #[test]
    fn encode_all_stops_at_first_failure() {
        let codec = Codec::<i32>::new(
            |n: &i32| {
                if *n < 0 {
                    Err(CodecError::encode("negative"))
                } else {
                    Ok(n.to_string())
                }
            },
            |raw: &str| raw.parse().map_err(CodecError::decode),
        );

        assert_eq!(codec.encode_all(&[1, 2]).unwrap(), vec!["1", "2"]);
        assert_eq!(
            codec.encode_all(&[1, -1, 2]).unwrap_err(),
            CodecError::Encode("negative".into())
        );
    }

    #[test]
    fn clones_share_functions() {
        let codec = Codec::<u8>::plain();
        let copy = codec.clone();
        assert_eq!(copy.encode(&3).unwrap(), codec.encode(&3).unwrap());
    }
}
