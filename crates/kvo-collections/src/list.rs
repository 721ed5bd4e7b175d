//! Typed lists backed by a store list.
//!
//! # Ordering
//!
//! Every write goes through [`List::append_batch_head_first`], a single
//! `LPUSH` of the whole batch. The store inserts each value at the head in
//! turn, so a batch `[a, b, c]` reads back as `[c, b, a]`. Reads return the
//! stored head-to-tail order unchanged.
//!
//! Transforms read the full list and write the result back through the same
//! primitive, so they reverse twice: `map` and `filter` results read back in
//! the order the source elements were appended.
//!
//! # Replace protocol
//!
//! [`TransformMode::Replace`] never writes into the source key directly:
//!
//! 1. the result is pushed under a temporary key (`<key>_<uuid>`);
//! 2. the source key is deleted;
//! 3. the temporary key is renamed onto the source key.
//!
//! A failure during step 1 leaves the source untouched. A failure between
//! steps 1 and 2 leaves the source untouched and orphans the temporary key.
//! Only a failure between steps 2 and 3 loses data, so nothing runs between
//! them. Two replaces racing on one key both read the same source and the
//! later rename wins; callers that care must serialize transforms per key.

use std::fmt;
use std::sync::Arc;

use kvo_codec::{Codec, CodecResult};
use kvo_store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CollectionError, Result};
use crate::keys::temp_key;
use crate::mode::TransformMode;

/// An ordered collection of `T` stored as a list under one key.
///
/// Constructing a `List` has no remote effect; the key appears on first
/// append. The store handle is shared and outlives no particular list.
pub struct List<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    codec: Codec<T>,
}

impl<T: Serialize + DeserializeOwned + 'static> List<T> {
    /// A list using the JSON codec.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::with_codec(store, key, Codec::json())
    }
}

impl<T> List<T> {
    /// A list using an explicit codec.
    pub fn with_codec(store: Arc<dyn KeyValueStore>, key: impl Into<String>, codec: Codec<T>) -> Self {
        Self {
            store,
            key: key.into(),
            codec,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn codec(&self) -> &Codec<T> {
        &self.codec
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // ---- Codec configuration ----

    /// Replace the encoder used by later writes. Stored data is not touched.
    pub fn set_serializer<E>(&mut self, encode: E) -> &mut Self
    where
        E: Fn(&T) -> CodecResult<String> + Send + Sync + 'static,
    {
        self.codec = self.codec.clone().with_encoder(encode);
        self
    }

    /// Replace the decoder used by later reads.
    pub fn set_deserializer<D>(&mut self, decode: D) -> &mut Self
    where
        D: Fn(&str) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.codec = self.codec.clone().with_decoder(decode);
        self
    }

    pub fn set_codec(&mut self, codec: Codec<T>) -> &mut Self {
        self.codec = codec;
        self
    }

    pub fn with_serializer<E>(mut self, encode: E) -> Self
    where
        E: Fn(&T) -> CodecResult<String> + Send + Sync + 'static,
    {
        self.set_serializer(encode);
        self
    }

    pub fn with_deserializer<D>(mut self, decode: D) -> Self
    where
        D: Fn(&str) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.set_deserializer(decode);
        self
    }

    // ---- Reads ----

    /// Number of stored elements; `0` when the key does not exist.
    pub async fn length(&self) -> Result<u64> {
        Ok(self.store.llen(&self.key).await?)
    }

    /// The element at `index` in stored order. Negative indexes count from
    /// the tail.
    pub async fn at(&self, index: i64) -> Result<T> {
        let raw = self
            .store
            .lindex(&self.key, index)
            .await?
            .ok_or_else(|| CollectionError::NotFound {
                key: self.key.clone(),
                index,
            })?;
        self.decode(index, &raw)
    }

    /// Every element, head to tail.
    ///
    /// This is a full fetch of the list; nothing is streamed. A single
    /// undecodable element fails the whole call.
    pub async fn items(&self) -> Result<Vec<T>> {
        let raw = self.store.lrange(&self.key, 0, -1).await?;
        raw.iter()
            .enumerate()
            .map(|(i, value)| self.decode(i as i64, value))
            .collect()
    }

    fn decode(&self, index: i64, raw: &str) -> Result<T> {
        self.codec
            .decode(raw)
            .map_err(|source| CollectionError::Deserialization {
                key: self.key.clone(),
                index,
                source,
            })
    }

    // ---- Writes ----

    /// Append one element. Returns the list length afterwards.
    pub async fn append(&self, item: &T) -> Result<u64> {
        self.append_all(std::slice::from_ref(item)).await
    }

    /// Append a batch in a single store command.
    ///
    /// Every element is encoded before anything is sent, so an encode failure
    /// writes nothing. A multi-element batch reads back reversed.
    pub async fn append_all(&self, items: &[T]) -> Result<u64> {
        let encoded =
            self.codec
                .encode_all(items)
                .map_err(|source| CollectionError::Serialization {
                    key: self.key.clone(),
                    source,
                })?;
        self.append_batch_head_first(&encoded).await
    }

    /// Push already encoded values onto the head of the list, last value
    /// first. The only write path for list contents.
    ///
    /// An empty batch sends no write (the store rejects an empty push) and
    /// reports the current length.
    pub async fn append_batch_head_first(&self, encoded: &[String]) -> Result<u64> {
        if encoded.is_empty() {
            return self.length().await;
        }
        let len = self.store.lpush(&self.key, encoded).await?;
        debug!(key = %self.key, count = encoded.len(), len, "pushed batch");
        Ok(len)
    }

    /// Delete the list. Deleting a missing list is not an error.
    pub async fn obliterate(&self) -> Result<()> {
        let existed = self.store.del(&self.key).await?;
        debug!(key = %self.key, existed, "obliterated list");
        Ok(())
    }

    // ---- Transforms ----

    /// Apply `transform(element, index, all)` to every element, JSON-encoding
    /// the results.
    pub async fn map<U, F>(&self, mode: TransformMode, transform: F) -> Result<List<U>>
    where
        U: Serialize + DeserializeOwned + 'static,
        F: FnMut(&T, usize, &[T]) -> U,
    {
        self.map_with_codec(mode, Codec::json(), transform).await
    }

    /// [`map`](Self::map) with an explicit codec for the results.
    pub async fn map_with_codec<U, F>(
        &self,
        mode: TransformMode,
        codec: Codec<U>,
        mut transform: F,
    ) -> Result<List<U>>
    where
        F: FnMut(&T, usize, &[T]) -> U,
    {
        let items = self.items().await?;
        let mapped: Vec<U> = items
            .iter()
            .enumerate()
            .map(|(i, item)| transform(item, i, &items))
            .collect();
        self.write_back(mode, codec, mapped).await
    }

    /// Map into a new list under a generated key.
    pub async fn map_copy<U, F>(&self, transform: F) -> Result<List<U>>
    where
        U: Serialize + DeserializeOwned + 'static,
        F: FnMut(&T, usize, &[T]) -> U,
    {
        self.map(TransformMode::Copy, transform).await
    }

    /// Map and swap the result in under this list's key.
    pub async fn map_replace<U, F>(&self, transform: F) -> Result<List<U>>
    where
        U: Serialize + DeserializeOwned + 'static,
        F: FnMut(&T, usize, &[T]) -> U,
    {
        self.map(TransformMode::Replace, transform).await
    }

    /// Keep the elements for which `predicate(element, index, all)` holds,
    /// in their original relative order. The result uses this list's codec.
    pub async fn filter<P>(&self, mode: TransformMode, predicate: P) -> Result<List<T>>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        let kept = retain(self.items().await?, predicate);
        self.write_back(mode, self.codec.clone(), kept).await
    }

    pub async fn filter_copy<P>(&self, predicate: P) -> Result<List<T>>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        self.filter(TransformMode::Copy, predicate).await
    }

    pub async fn filter_replace<P>(&self, predicate: P) -> Result<List<T>>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        self.filter(TransformMode::Replace, predicate).await
    }

    /// The matching elements, read-only. Creates and modifies nothing.
    pub async fn select<P>(&self, predicate: P) -> Result<Vec<T>>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        Ok(retain(self.items().await?, predicate))
    }

    /// Same as [`select`](Self::select).
    ///
    /// Despite the name this is not a fold: it returns the matching elements
    /// and never accumulates.
    pub async fn reduce<P>(&self, predicate: P) -> Result<Vec<T>>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        self.select(predicate).await
    }

    /// Stage `items` under a temporary key, then either hand that key back
    /// (copy) or swap it onto this list's key (replace).
    async fn write_back<U>(&self, mode: TransformMode, codec: Codec<U>, items: Vec<U>) -> Result<List<U>> {
        let staged = List::with_codec(Arc::clone(&self.store), temp_key(&self.key), codec);
        staged.append_all(&items).await?;
        debug!(
            key = %self.key,
            temp_key = %staged.key,
            count = items.len(),
            %mode,
            "staged transform result"
        );
        match mode {
            TransformMode::Copy => Ok(staged),
            TransformMode::Replace => self.swap_in(staged, !items.is_empty()).await,
        }
    }

    /// Delete this key and rename `staged` onto it, back to back.
    ///
    /// An empty result never created its staging key, so there is nothing to
    /// rename and the deleted key already reads as the empty result.
    async fn swap_in<U>(&self, staged: List<U>, populated: bool) -> Result<List<U>> {
        self.store.del(&self.key).await?;
        if populated {
            self.store.rename(&staged.key, &self.key).await?;
        }
        debug!(key = %self.key, temp_key = %staged.key, populated, "replaced list");
        Ok(List {
            store: staged.store,
            key: self.key.clone(),
            codec: staged.codec,
        })
    }
}

/// Filter by a predicate that sees the whole sequence.
fn retain<T, P>(items: Vec<T>, mut predicate: P) -> Vec<T>
where
    P: FnMut(&T, usize, &[T]) -> bool,
{
    let keep: Vec<bool> = items
        .iter()
        .enumerate()
        .map(|(i, item)| predicate(item, i, &items))
        .collect();
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            codec: self.codec.clone(),
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("key", &self.key)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
