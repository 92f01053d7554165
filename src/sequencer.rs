//! Episode sequencing within one collection
//!
//! Answers "what plays next" questions for the player: next and previous
//! episode by offset, the final episode, and where an episode sits in its
//! series.

use crate::catalog::{CatalogStore, MediaItem};
use serde::Serialize;
use std::fmt;

/// Position of a media item within its series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpisodeType {
    NoEpisode,
    FirstEpisode,
    MiddleEpisode,
    FinalEpisode,
}

impl EpisodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEpisode => "NoEpisode",
            Self::FirstEpisode => "FirstEpisode",
            Self::MiddleEpisode => "MiddleEpisode",
            Self::FinalEpisode => "FinalEpisode",
        }
    }
}

impl fmt::Display for EpisodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Episode queries scoped to one collection
///
/// Lookups that find nothing return `None`; they never fail.
pub struct EpisodeSequencer<'a> {
    catalog: &'a CatalogStore,
    collection_id: &'a str,
}

impl<'a> EpisodeSequencer<'a> {
    /// Creates a sequencer over the members of one collection
    ///
    /// # Arguments
    ///
    /// * `catalog` - The catalog holding the media items
    /// * `collection_id` - The collection whose members form the sequence
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_navigator::{CatalogStore, EpisodeSequencer, MediaItem, MediaType};
    ///
    /// let mut catalog = CatalogStore::new();
    /// catalog.replace_media(
    ///     (1..=3)
    ///         .map(|n| MediaItem {
    ///             id: format!("E{}", n),
    ///             media_type: MediaType::Episode,
    ///             collection_id: Some("C1".to_string()),
    ///             episode: n,
    ///             ..MediaItem::default()
    ///         })
    ///         .collect(),
    /// );
    ///
    /// let sequencer = EpisodeSequencer::new(&catalog, "C1");
    /// assert_eq!(sequencer.next_episode("E1", 1), Some("E2"));
    /// assert_eq!(sequencer.final_episode(), Some("E3"));
    /// ```
    pub fn new(catalog: &'a CatalogStore, collection_id: &'a str) -> Self {
        Self {
            catalog,
            collection_id,
        }
    }

    pub fn collection_id(&self) -> &str {
        self.collection_id
    }

    fn members(&self) -> impl Iterator<Item = &'a MediaItem> + use<'a> {
        let collection_id = self.collection_id;
        self.catalog.members(collection_id)
    }

    /// ID of the member with the highest episode number
    ///
    /// On ties the first member in catalog order wins.
    pub fn final_episode(&self) -> Option<&'a str> {
        let mut best: Option<&MediaItem> = None;
        for media in self.members() {
            if best.is_none_or(|b| media.episode > b.episode) {
                best = Some(media);
            }
        }
        best.map(|m| m.id.as_str())
    }

    /// ID of the member whose episode number is the current one plus `offset`
    ///
    /// # Arguments
    ///
    /// * `current_id` - ID of the playing item, looked up anywhere in the catalog
    /// * `offset` - Distance in episode numbers; negative walks backwards
    ///
    /// # Returns
    ///
    /// The first member with the target episode number, or `None` if the
    /// current item is unknown, no member has that number, or the target
    /// overflows.
    pub fn next_episode(&self, current_id: &str, offset: i32) -> Option<&'a str> {
        let current = self.catalog.media_item(current_id)?;
        let target = current.episode.checked_add(offset)?;
        self.members()
            .find(|m| m.episode == target)
            .map(|m| m.id.as_str())
    }

    /// Classifies an item as first, middle or final episode
    ///
    /// Anything that is not an episode, including unknown IDs, is `NoEpisode`.
    /// A single-episode series reports `FirstEpisode`.
    pub fn episode_type(&self, current_id: &str) -> EpisodeType {
        let Some(current) = self.catalog.media_item(current_id) else {
            return EpisodeType::NoEpisode;
        };
        if !current.is_episode() {
            EpisodeType::NoEpisode
        } else if current.episode == 1 {
            EpisodeType::FirstEpisode
        } else if self.final_episode() == Some(current.id.as_str()) {
            EpisodeType::FinalEpisode
        } else {
            EpisodeType::MiddleEpisode
        }
    }
}
