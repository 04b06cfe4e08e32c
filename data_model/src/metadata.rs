//! Metadata: limited key-value pairs attached to accounts, domains,
//! assets and triggers.

use std::collections::BTreeMap;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::Name;

/// A value stored in [`Metadata`], kept as canonical JSON text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Decode, Encode)]
pub struct JsonString(String);

impl JsonString {
    /// Construct from an already-parsed JSON value.
    pub fn new(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    /// The canonical JSON text of this value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<bool> for JsonString {
    fn from(value: bool) -> Self {
        Self::new(&serde_json::Value::Bool(value))
    }
}

impl From<u32> for JsonString {
    fn from(value: u32) -> Self {
        Self::new(&serde_json::Value::from(value))
    }
}

impl From<&str> for JsonString {
    fn from(value: &str) -> Self {
        Self::new(&serde_json::Value::from(value))
    }
}

impl Serialize for JsonString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::Error as _;

        let value: serde_json::Value =
            serde_json::from_str(&self.0).map_err(S::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::new(&value))
    }
}

/// Limits a [`Metadata`] store must respect on checked insertion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize,
)]
pub struct MetadataLimits {
    /// Maximum number of entries.
    pub capacity: u32,
    /// Maximum combined length of an entry's key and rendered value.
    pub max_entry_len: u32,
}

impl MetadataLimits {
    /// Constructor.
    pub const fn new(capacity: u32, max_entry_len: u32) -> Self {
        Self {
            capacity,
            max_entry_len,
        }
    }
}

impl Default for MetadataLimits {
    fn default() -> Self {
        Self::new(1024, 4096)
    }
}

/// Error returned when a checked insertion would break the limits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
)]
pub enum MetadataError {
    /// The store is already at its configured capacity.
    #[error("Metadata store is full: capacity is {limit} entries")]
    OverCapacity {
        /// Configured capacity.
        limit: u32,
    },
    /// A single entry exceeds the per-entry length limit.
    #[error("Metadata entry is too big: {actual} bytes given, {limit} allowed")]
    EntryTooBig {
        /// Configured per-entry limit.
        limit: u32,
        /// Actual entry length.
        actual: u32,
    },
}

/// Collection of parameters by their names with checked insertion.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Metadata(BTreeMap<Name, JsonString>);

impl Metadata {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the internal map contains the given key.
    pub fn contains(&self, key: &Name) -> bool {
        self.0.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over key/value pairs stored in the internal map.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Name, &JsonString)> {
        self.0.iter()
    }

    /// Get the value associated to `key`, if present.
    pub fn get(&self, key: &Name) -> Option<&JsonString> {
        self.0.get(key)
    }

    /// Insert a value under the given key without checking limits.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: Name, value: impl Into<JsonString>) -> Option<JsonString> {
        self.0.insert(key, value.into())
    }

    /// Insert a value under the given key, rejecting entries which would
    /// break `limits`. Returns the previous value, if any.
    ///
    /// # Errors
    /// Fails if the store is at capacity or the entry is too large.
    pub fn insert_with_limits(
        &mut self,
        key: Name,
        value: impl Into<JsonString>,
        limits: MetadataLimits,
    ) -> Result<Option<JsonString>, MetadataError> {
        let value = value.into();
        if self.0.len() >= limits.capacity as usize && !self.0.contains_key(&key) {
            return Err(MetadataError::OverCapacity {
                limit: limits.capacity,
            });
        }
        let entry_len = key.as_ref().len() + value.as_str().len();
        if entry_len > limits.max_entry_len as usize {
            return Err(MetadataError::EntryTooBig {
                limit: limits.max_entry_len,
                actual: u32::try_from(entry_len).unwrap_or(u32::MAX),
            });
        }
        Ok(self.0.insert(key, value))
    }

    /// Remove the value stored under `key`, returning it if it was
    /// present.
    pub fn remove(&mut self, key: &Name) -> Option<JsonString> {
        self.0.remove(key)
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{JsonString, Metadata, MetadataError, MetadataLimits};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(candidate: &str) -> Name {
        candidate.parse().expect("Valid")
    }

    #[test]
    fn insert_respects_capacity() {
        let limits = MetadataLimits::new(2, 128);
        let mut metadata = Metadata::new();
        metadata
            .insert_with_limits(name("first"), true, limits)
            .expect("Under capacity");
        metadata
            .insert_with_limits(name("second"), true, limits)
            .expect("At capacity");
        assert!(matches!(
            metadata.insert_with_limits(name("third"), true, limits),
            Err(MetadataError::OverCapacity { limit: 2 })
        ));
        // Overwriting an existing key does not grow the store.
        metadata
            .insert_with_limits(name("first"), false, limits)
            .expect("Overwrite");
    }

    #[test]
    fn insert_respects_entry_length() {
        let limits = MetadataLimits::new(16, 8);
        let mut metadata = Metadata::new();
        assert!(matches!(
            metadata.insert_with_limits(name("oversized"), "long value", limits),
            Err(MetadataError::EntryTooBig { .. })
        ));
    }

    #[test]
    fn json_values_survive_serde() {
        let mut metadata = Metadata::new();
        metadata.insert(name("flag"), true);
        metadata.insert(name("count"), 7_u32);

        let json = serde_json::to_string(&metadata).expect("Valid");
        let back: Metadata = serde_json::from_str(&json).expect("Valid");
        assert_eq!(back, metadata);
        assert_eq!(back.get(&name("flag")).map(JsonString::as_str), Some("true"));
    }
}
