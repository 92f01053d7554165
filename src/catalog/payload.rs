//! Catalog payloads as delivered by the fetch collaborator
//!
//! The server answers `/download/media_data` with
//! `{"collections": [...], "media": [...]}` and `/download/media_metadata`
//! with `{"mediaMetadata": [...]}`. Field values are not strongly typed on the
//! wire: numbers may arrive as strings, strings as numbers, and anything may
//! be null. The helpers here decode such values into neutral defaults instead
//! of rejecting the whole catalog.

use super::{Collection, MediaItem, WatchMetadata};
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while decoding a catalog payload
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The document is not valid JSON or has the wrong top-level shape
    #[error("Failed to parse {kind} payload: {source}")]
    Malformed {
        kind: &'static str,
        source: serde_json::Error,
    },
}

/// Collections and media items from a single catalog download
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaDataPayload {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataDocument {
    Bare(Vec<WatchMetadata>),
    Wrapped {
        #[serde(rename = "mediaMetadata", default)]
        media_metadata: Vec<WatchMetadata>,
    },
}

/// Decodes a `media_data` document
///
/// Entries without an identifier cannot be addressed by the engine and are
/// dropped with a warning.
///
/// # Arguments
///
/// * `json` - The document text, `{"collections": [...], "media": [...]}`
///
/// # Returns
///
/// The decoded payload, or `PayloadError::Malformed` if the text is not JSON
/// or has the wrong top-level shape. Bad field values never fail the document.
pub fn parse_media_data(json: &str) -> Result<MediaDataPayload, PayloadError> {
    let mut payload: MediaDataPayload =
        serde_json::from_str(json).map_err(|source| PayloadError::Malformed {
            kind: "media data",
            source,
        })?;

    payload.collections.retain(|collection| {
        let keep = !collection.id.is_empty();
        if !keep {
            warn!(title = %collection.collection_title, "Dropping collection without ID");
        }
        keep
    });
    payload.media.retain(|media| {
        let keep = !media.id.is_empty();
        if !keep {
            warn!(title = %media.title, "Dropping media item without ID");
        }
        keep
    });

    Ok(payload)
}

/// Decodes a `media_metadata` document, wrapped or as a bare array
pub fn parse_media_metadata(json: &str) -> Result<Vec<WatchMetadata>, PayloadError> {
    let document: MetadataDocument =
        serde_json::from_str(json).map_err(|source| PayloadError::Malformed {
            kind: "media metadata",
            source,
        })?;

    let mut entries = match document {
        MetadataDocument::Bare(entries) => entries,
        MetadataDocument::Wrapped { media_metadata } => media_metadata,
    };
    entries.retain(|entry| {
        let keep = !entry.media_id.is_empty();
        if !keep {
            warn!("Dropping watch metadata without media ID");
        }
        keep
    });

    Ok(entries)
}

/// Decodes a string field, accepting numbers and mapping null to empty
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Decodes an optional reference; empty strings mean "no reference"
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = lenient_string(deserializer)?;
    Ok(if id.is_empty() { None } else { Some(id) })
}

/// Decodes a float, accepting numeric strings and mapping anything else to 0
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

/// Decodes an integer, accepting floats and numeric strings, mapping anything else to 0
pub(crate) fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            .or_else(|| n.as_f64().map(|v| v as i32))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|v| v as i32))
                .unwrap_or(0)
        }
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CollectionType, MediaType};

    #[test]
    fn test_parse_media_data() {
        let json = r#"{
            "collections": [
                {"ID": "C1", "collection_title": "Dark", "collection_type": "serie",
                 "genres": "[\"Drama\"]", "producer": "Netflix", "collection_rating": "8.7", "year": 2017}
            ],
            "media": [
                {"ID": "E1", "type": "episode", "title": "Secrets", "collection_id": "C1",
                 "genres": "[]", "year": "2017", "rating": 8.1, "season": 1, "episode": "1"},
                {"ID": "M1", "type": "movie", "title": "Heat", "collection_id": "",
                 "genres": null, "year": 1995, "producer": null}
            ]
        }"#;

        let payload = parse_media_data(json).unwrap();
        assert_eq!(payload.collections.len(), 1);
        assert_eq!(payload.media.len(), 2);

        let collection = &payload.collections[0];
        assert_eq!(collection.collection_type, CollectionType::Serie);
        assert_eq!(collection.collection_rating, 8.7);
        assert!(collection.genres.contains("Drama"));

        let episode = &payload.media[0];
        assert_eq!(episode.media_type, MediaType::Episode);
        assert_eq!(episode.collection_id.as_deref(), Some("C1"));
        assert_eq!(episode.year, 2017);
        assert_eq!(episode.episode, 1);

        let movie = &payload.media[1];
        assert_eq!(movie.collection_id, None);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.producer, "");
        assert_eq!(movie.rating, 0.0);
    }

    #[test]
    fn test_parse_media_data_drops_entries_without_id() {
        let json = r#"{"media": [{"title": "Orphan"}, {"ID": 42, "title": "Numbered"}]}"#;
        let payload = parse_media_data(json).unwrap();

        assert!(payload.collections.is_empty());
        assert_eq!(payload.media.len(), 1);
        assert_eq!(payload.media[0].id, "42");
    }

    #[test]
    fn test_parse_media_data_rejects_wrong_shape() {
        assert!(parse_media_data("[1, 2, 3]").is_err());
        assert!(parse_media_data("not json").is_err());
    }

    #[test]
    fn test_parse_media_metadata_wrapped_and_bare() {
        let wrapped = r#"{"mediaMetadata": [
            {"media_id": "E1", "percentageWatched": 0.4, "language_chosen": "de", "subtitles_chosen": "en"}
        ]}"#;
        let bare = r#"[{"ID": "E2", "percentage_watched": "0.25"}]"#;

        let wrapped = parse_media_metadata(wrapped).unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].media_id, "E1");
        assert_eq!(wrapped[0].percentage_watched, 0.4);
        assert_eq!(wrapped[0].language_chosen, "de");

        let bare = parse_media_metadata(bare).unwrap();
        assert_eq!(bare[0].media_id, "E2");
        assert_eq!(bare[0].percentage_watched, 0.25);
    }

    #[test]
    fn test_lenient_numbers() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "lenient_i32")]
            int: i32,
            #[serde(default, deserialize_with = "lenient_f64")]
            float: f64,
        }

        let probe: Probe = serde_json::from_str(r#"{"int": "7.9", "float": "abc"}"#).unwrap();
        assert_eq!(probe.int, 7);
        assert_eq!(probe.float, 0.0);

        let probe: Probe = serde_json::from_str(r#"{"int": null}"#).unwrap();
        assert_eq!(probe.int, 0);
        assert_eq!(probe.float, 0.0);
    }

    #[test]
    fn test_lowercase_id_key_does_not_reject_payload() {
        let json = r#"{"media": [{"ID": "M1", "id": "m-1", "type": "movie", "title": "Heat"}]}"#;
        let payload = parse_media_data(json).unwrap();
        assert_eq!(payload.media.len(), 1);
        assert_eq!(payload.media[0].id, "M1");
    }
}
