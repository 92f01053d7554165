//! Catalog data model and store
//!
//! This module provides structures for the three raw catalog inputs
//! (collections, media items and per-user watch metadata) and the
//! `CatalogStore` that holds them. The store applies no filtering of its own.
mod genres;
mod payload;

pub use genres::Genres;
pub use payload::{MediaDataPayload, PayloadError, parse_media_data, parse_media_metadata};

use payload::{lenient_f64, lenient_i32, lenient_string, optional_id};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a single playable media item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Episode,
    /// Any value the catalog server sends that this client does not know
    #[default]
    Unknown,
}

impl MediaType {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "movie" => Self::Movie,
            "episode" => Self::Episode,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Episode => "episode",
            Self::Unknown => "unknown",
        }
    }
}

/// Kind of a collection: a movie grouping or a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollectionType {
    Movies,
    Serie,
    #[default]
    Unknown,
}

impl CollectionType {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "movies" => Self::Movies,
            "serie" => Self::Serie,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Serie => "serie",
            Self::Unknown => "unknown",
        }
    }
}

macro_rules! wire_enum_serde {
    ($ty:ty) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                Ok(Self::from_wire(&lenient_string(deserializer)?))
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

wire_enum_serde!(MediaType);
wire_enum_serde!(CollectionType);

/// A single playable item: a movie or an episode of a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Back-reference to the owning collection; not ownership
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub genres: Genres,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: i32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub producer: String,
    /// 0 when the server has no rating
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub season: i32,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub episode: i32,
}

impl MediaItem {
    pub fn is_episode(&self) -> bool {
        self.media_type == MediaType::Episode
    }

    pub fn belongs_to(&self, collection_id: &str) -> bool {
        self.collection_id.as_deref() == Some(collection_id)
    }
}

/// A named grouping of media items: a series or a movie franchise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub collection_title: String,
    #[serde(default)]
    pub collection_type: CollectionType,
    #[serde(default)]
    pub genres: Genres,
    #[serde(default, deserialize_with = "lenient_string")]
    pub producer: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub collection_rating: f64,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: i32,
}

/// Per-user playback state for one media item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchMetadata {
    #[serde(
        alias = "ID",
        alias = "mediaID",
        default,
        deserialize_with = "lenient_string"
    )]
    pub media_id: String,
    /// Fraction already watched, 0.0 to 1.0
    #[serde(alias = "percentageWatched", default, deserialize_with = "lenient_f64")]
    pub percentage_watched: f64,
    #[serde(alias = "languageChosen", default, deserialize_with = "lenient_string")]
    pub language_chosen: String,
    #[serde(alias = "subtitlesChosen", default, deserialize_with = "lenient_string")]
    pub subtitles_chosen: String,
}

/// One entry of the published result list
///
/// Serializes without a tag so consumers see the catalog's own record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultEntry {
    Media(MediaItem),
    Collection(Collection),
}

impl ResultEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Media(media) => &media.id,
            Self::Collection(collection) => &collection.id,
        }
    }

    /// Display title: media `title`, falling back to `collection_title`
    pub fn title(&self) -> &str {
        match self {
            Self::Media(media) => &media.title,
            Self::Collection(collection) => &collection.collection_title,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Media(media) => media.year,
            Self::Collection(collection) => collection.year,
        }
    }

    /// Rating: media `rating`, falling back to `collection_rating`
    pub fn rating(&self) -> f64 {
        match self {
            Self::Media(media) => media.rating,
            Self::Collection(collection) => collection.collection_rating,
        }
    }

    pub fn as_media(&self) -> Option<&MediaItem> {
        match self {
            Self::Media(media) => Some(media),
            Self::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Media(_) => None,
            Self::Collection(collection) => Some(collection),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

/// Holds the raw catalog exactly as the fetch collaborator supplied it
///
/// Collections and media are replaced wholesale. Watch metadata is upserted
/// by media ID, so entries for items that left the catalog may persist.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    collections: Vec<Collection>,
    media: Vec<MediaItem>,
    metadata: HashMap<String, WatchMetadata>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn media(&self) -> &[MediaItem] {
        &self.media
    }

    pub fn metadata(&self) -> &HashMap<String, WatchMetadata> {
        &self.metadata
    }

    pub fn replace_collections(&mut self, collections: Vec<Collection>) {
        self.collections = collections;
    }

    pub fn replace_media(&mut self, media: Vec<MediaItem>) {
        self.media = media;
    }

    /// Upserts metadata records by media ID and returns how many were merged
    pub fn merge_metadata<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = WatchMetadata>,
    {
        let mut merged = 0;
        for entry in entries {
            self.metadata.insert(entry.media_id.clone(), entry);
            merged += 1;
        }
        merged
    }

    pub fn collection(&self, collection_id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == collection_id)
    }

    pub fn media_item(&self, media_id: &str) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.id == media_id)
    }

    /// Member items of a collection, in catalog order
    ///
    /// The items borrow from the store; the iterator itself only lives as
    /// long as `collection_id`.
    pub fn members<'a, 'b>(
        &'a self,
        collection_id: &'b str,
    ) -> impl Iterator<Item = &'a MediaItem> + use<'a, 'b>
    where
        'a: 'b,
    {
        self.media.iter().filter(move |m| m.belongs_to(collection_id))
    }

    /// The parent collection of an item, if it references one that exists
    pub fn parent_of(&self, media: &MediaItem) -> Option<&Collection> {
        media
            .collection_id
            .as_deref()
            .and_then(|id| self.collection(id))
    }

    pub fn watch_metadata(&self, media_id: &str) -> Option<&WatchMetadata> {
        self.metadata.get(media_id)
    }

    /// Watch progress of an item, 0.0 when unknown
    pub fn progress(&self, media_id: &str) -> f64 {
        self.metadata
            .get(media_id)
            .map(|meta| meta.percentage_watched)
            .unwrap_or(0.0)
    }
}
