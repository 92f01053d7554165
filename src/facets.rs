//! Catalog-wide facet values for populating filter controls
//!
//! Nothing here is cached: each call scans the current catalog.

use crate::catalog::CatalogStore;
use crate::view_state::ALL_PRODUCERS;
use serde::Serialize;
use std::collections::BTreeSet;

/// A genre as presented to a filter control
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GenreOption {
    pub text: String,
}

/// Distinct genres across collections and media items, sorted by name
pub fn unique_genres(catalog: &CatalogStore) -> Vec<GenreOption> {
    let collection_genres = catalog.collections().iter().flat_map(|c| c.genres.iter());
    let media_genres = catalog.media().iter().flat_map(|m| m.genres.iter());

    collection_genres
        .chain(media_genres)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|genre| GenreOption {
            text: genre.to_string(),
        })
        .collect()
}

/// Distinct non-empty producers, with the `"All"` sentinel always first
pub fn unique_producers(catalog: &CatalogStore) -> Vec<String> {
    let collection_producers = catalog.collections().iter().map(|c| c.producer.as_str());
    let media_producers = catalog.media().iter().map(|m| m.producer.as_str());

    let producers: BTreeSet<&str> = collection_producers
        .chain(media_producers)
        .filter(|p| !p.is_empty() && *p != ALL_PRODUCERS)
        .collect();

    std::iter::once(ALL_PRODUCERS)
        .chain(producers)
        .map(str::to_string)
        .collect()
}

/// Decade label of a release year, e.g. `1994` becomes `"1990's"`
///
/// Years at or below zero have no era and yield `None`.
pub fn era_from_year(year: i32) -> Option<String> {
    if year <= 0 {
        return None;
    }
    Some(format!("{}'s", (year / 10) * 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Collection, Genres, MediaItem};

    fn catalog() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_collections(vec![Collection {
            id: "C1".to_string(),
            genres: Genres::new(["Drama", "Mystery"]),
            producer: "Netflix".to_string(),
            ..Collection::default()
        }]);
        store.replace_media(vec![
            MediaItem {
                id: "M1".to_string(),
                genres: Genres::new(["Action", "Drama"]),
                producer: "Warner".to_string(),
                ..MediaItem::default()
            },
            MediaItem {
                id: "M2".to_string(),
                genres: Genres::parse("not json"),
                producer: "Netflix".to_string(),
                ..MediaItem::default()
            },
            MediaItem {
                id: "M3".to_string(),
                ..MediaItem::default()
            },
        ]);
        store
    }

    #[test]
    fn test_era_from_year() {
        assert_eq!(era_from_year(1994).as_deref(), Some("1990's"));
        assert_eq!(era_from_year(2000).as_deref(), Some("2000's"));
        assert_eq!(era_from_year(0), None);
        assert_eq!(era_from_year(-5), None);
    }

    #[test]
    fn test_unique_genres() {
        let genres: Vec<String> = unique_genres(&catalog()).into_iter().map(|g| g.text).collect();
        assert_eq!(genres, vec!["Action", "Drama", "Mystery"]);
    }

    #[test]
    fn test_unique_producers_starts_with_all() {
        let producers = unique_producers(&catalog());
        assert_eq!(producers, vec!["All", "Netflix", "Warner"]);

        let empty = unique_producers(&CatalogStore::new());
        assert_eq!(empty, vec!["All"]);
    }

    #[test]
    fn test_genre_option_serializes_as_text_record() {
        let json = serde_json::to_string(&GenreOption {
            text: "Drama".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"text":"Drama"}"#);
    }
}
