//! Catalog Navigator - browse a personal media-streaming catalog
//!
//! This library turns a flat catalog (collections, media items and per-user
//! watch metadata) plus a set of view parameters into the ordered list of
//! entries a client should display, and answers episode sequencing questions
//! for the player.
//!
//! # Examples
//!
//! ```
//! use catalog_navigator::{Navigator, parse_media_data};
//!
//! let payload = parse_media_data(r#"{
//!     "collections": [{"ID": "C1", "collection_title": "Dark", "collection_type": "serie",
//!                      "genres": "[\"Drama\"]", "year": 2017}],
//!     "media": [
//!         {"ID": "E1", "type": "episode", "title": "Secrets", "collection_id": "C1", "season": 1, "episode": 1},
//!         {"ID": "E2", "type": "episode", "title": "Lies", "collection_id": "C1", "season": 1, "episode": 2}
//!     ]
//! }"#).unwrap();
//!
//! let mut navigator = Navigator::new();
//! navigator.load_media_data(payload);
//! navigator.set_current_category("series");
//! assert_eq!(navigator.result()[0].id(), "C1");
//!
//! navigator.set_selected_collection_id("C1");
//! assert_eq!(navigator.next_episode("E1", 1), Some("E2"));
//! ```

mod catalog;
mod facets;
mod navigator;
mod pipeline;
mod sequencer;
mod snapshot;
mod view_state;

// Re-export error types
pub use catalog::PayloadError;
pub use snapshot::SnapshotError;
pub use view_state::ViewStateError;

// Re-export the data model
pub use catalog::{
    CatalogStore, Collection, CollectionType, Genres, MediaDataPayload, MediaItem, MediaType,
    ResultEntry, WatchMetadata, parse_media_data, parse_media_metadata,
};

// Re-export the engine and its parts
pub use facets::{GenreOption, era_from_year, unique_genres, unique_producers};
pub use navigator::{Navigator, NavigatorEvent};
pub use pipeline::{
    FINISHED_THRESHOLD, collection_passes, compute, is_in_progress, media_passes,
    representative_year,
};
pub use sequencer::{EpisodeSequencer, EpisodeType};
pub use snapshot::{CatalogSnapshot, SnapshotStorage};
pub use view_state::{ALL_PRODUCERS, Category, SortKey, TOP_RATED_THRESHOLD, ViewState};

use thiserror::Error;

/// Top-level error type for Catalog Navigator operations
///
/// Browsing itself never fails; errors only come from decoding catalog
/// payloads, snapshot storage and parsing view parameters from text.
#[derive(Debug, Error)]
pub enum CatalogNavigatorError {
    /// Error while decoding a catalog payload
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Error during snapshot operations
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Error while parsing a view parameter
    #[error("View state error: {0}")]
    ViewState(#[from] ViewStateError),

    /// Failed to serialize results for output
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
