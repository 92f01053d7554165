//! Multi-valued genre attribute
//!
//! The catalog server ships genres as a string that itself holds a JSON array
//! (`"[\"Drama\", \"Crime\"]"`). The list is decoded once when the catalog is
//! loaded so that filter passes work on real strings.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Ordered, de-duplicated list of genre names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    /// Builds a genre list from names, dropping duplicates while keeping first occurrence order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut genres = Vec::new();
        for name in names {
            let name = name.into();
            if !genres.contains(&name) {
                genres.push(name);
            }
        }
        Self(genres)
    }

    /// Decodes a JSON-array-encoded genre string
    ///
    /// Anything that is not an array yields an empty list, and non-string
    /// array members are skipped. Malformed input is never an error.
    pub fn parse(encoded: &str) -> Self {
        match serde_json::from_str::<Value>(encoded) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::new(items.into_iter().filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })),
            Value::String(encoded) => Self::parse(&encoded),
            _ => Self::default(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.0.iter().any(|g| g == genre)
    }

    /// Returns true if at least one genre is in `selected`
    pub fn intersects(&self, selected: &BTreeSet<String>) -> bool {
        self.0.iter().any(|g| selected.contains(g))
    }

    /// Re-encodes the list in the server's wire form
    pub fn to_encoded(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl<'de> Deserialize<'de> for Genres {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept the encoded string, a plain array, or null
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(Self::from_value).unwrap_or_default())
    }
}

impl Serialize for Genres {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_encoded())
    }
}
