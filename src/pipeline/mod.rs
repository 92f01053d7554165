//! Catalog query pipeline
//!
//! Turns the raw catalog plus a `ViewState` into the ordered list of entries
//! to display. Stages run in a fixed order on every call:
//! category → selected collection → search text → facets → collapse → sort.
//! Nothing is cached between calls.
mod classifier;
mod collapse;
mod facet_filter;
mod search;
mod sort;

pub use classifier::{FINISHED_THRESHOLD, is_in_progress};
pub use facet_filter::{collection_passes, media_passes};
pub use sort::representative_year;

use crate::catalog::{CatalogStore, Collection, MediaItem, ResultEntry};
use crate::view_state::ViewState;
use tracing::debug;

/// Entities still in the running between stages, borrowed from the catalog
#[derive(Debug, Default)]
pub(crate) struct WorkingSet<'a> {
    pub media: Vec<&'a MediaItem>,
    pub collections: Vec<&'a Collection>,
}

/// Computes the result list for a view of the catalog
///
/// # Arguments
///
/// * `catalog` - The raw catalog, left untouched
/// * `view` - The view parameters to apply
///
/// # Returns
///
/// The entries to display, in display order. Never fails; a view that
/// matches nothing yields an empty list.
///
/// # Examples
///
/// ```
/// use catalog_navigator::{CatalogStore, Category, MediaItem, MediaType, ViewState, compute};
///
/// let mut catalog = CatalogStore::new();
/// catalog.replace_media(vec![MediaItem {
///     id: "M1".to_string(),
///     media_type: MediaType::Movie,
///     title: "Heat".to_string(),
///     ..MediaItem::default()
/// }]);
///
/// let view = ViewState {
///     current_category: Category::Movies,
///     ..ViewState::default()
/// };
/// assert_eq!(compute(&catalog, &view)[0].id(), "M1");
/// ```
pub fn compute(catalog: &CatalogStore, view: &ViewState) -> Vec<ResultEntry> {
    let mut set = classifier::classify(catalog, &view.current_category);
    debug!(
        category = %view.current_category,
        media = set.media.len(),
        collections = set.collections.len(),
        "Category eligibility"
    );

    classifier::restrict_to_collection(&mut set, view.selected_collection());
    search::filter_by_text(&mut set, catalog, &view.search_text);
    facet_filter::apply(&mut set, catalog, view);
    debug!(
        media = set.media.len(),
        collections = set.collections.len(),
        "After collection, search and facet filters"
    );

    let mut entries = collapse::collapse(set, view);
    sort::sort_entries(&mut entries, catalog, view);
    debug!(
        entries = entries.len(),
        sort_by = %view.sort_by,
        ascending = view.sort_ascending,
        "Result computed"
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CollectionType, Genres, MediaType, WatchMetadata};
    use crate::view_state::Category;
    use std::collections::HashSet;

    fn catalog() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_collections(vec![
            Collection {
                id: "C1".to_string(),
                collection_title: "Dark".to_string(),
                collection_type: CollectionType::Serie,
                genres: Genres::new(["Drama"]),
                year: 2010,
                ..Collection::default()
            },
            Collection {
                id: "F1".to_string(),
                collection_title: "Alien".to_string(),
                collection_type: CollectionType::Movies,
                genres: Genres::new(["Sci-Fi", "Horror"]),
                producer: "Fox".to_string(),
                collection_rating: 8.4,
                year: 1979,
            },
        ]);
        store.replace_media(vec![
            MediaItem {
                id: "E2".to_string(),
                media_type: MediaType::Episode,
                title: "Lies".to_string(),
                collection_id: Some("C1".to_string()),
                season: 1,
                episode: 2,
                year: 2010,
                ..MediaItem::default()
            },
            MediaItem {
                id: "E1".to_string(),
                media_type: MediaType::Episode,
                title: "Secrets".to_string(),
                collection_id: Some("C1".to_string()),
                season: 1,
                episode: 1,
                year: 2010,
                ..MediaItem::default()
            },
            MediaItem {
                id: "A1".to_string(),
                media_type: MediaType::Movie,
                title: "Alien".to_string(),
                collection_id: Some("F1".to_string()),
                genres: Genres::new(["Horror"]),
                producer: "Fox".to_string(),
                year: 1979,
                rating: 8.5,
                ..MediaItem::default()
            },
            MediaItem {
                id: "A2".to_string(),
                media_type: MediaType::Movie,
                title: "Aliens".to_string(),
                collection_id: Some("F1".to_string()),
                genres: Genres::new(["Action"]),
                producer: "Fox".to_string(),
                year: 1986,
                rating: 8.4,
                ..MediaItem::default()
            },
            MediaItem {
                id: "H1".to_string(),
                media_type: MediaType::Movie,
                title: "Heat".to_string(),
                genres: Genres::new(["Crime", "Drama"]),
                producer: "Warner".to_string(),
                year: 1995,
                rating: 8.3,
                ..MediaItem::default()
            },
        ]);
        store.merge_metadata([WatchMetadata {
            media_id: "E1".to_string(),
            percentage_watched: 0.4,
            ..WatchMetadata::default()
        }]);
        store
    }

    fn ids(entries: &[ResultEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id()).collect()
    }

    fn view(category: Category) -> ViewState {
        ViewState {
            current_category: category,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_series_collapses_episodes_into_collection() {
        let store = catalog();
        let result = compute(&store, &view(Category::Series));
        assert_eq!(ids(&result), vec!["C1"]);
    }

    #[test]
    fn test_selected_series_lists_episodes_in_order() {
        let store = catalog();
        let view = ViewState {
            selected_collection_id: "C1".to_string(),
            ..view(Category::Series)
        };
        let result = compute(&store, &view);
        assert_eq!(ids(&result), vec!["E1", "E2"]);
        assert!(!result.iter().any(ResultEntry::is_collection));
    }

    #[test]
    fn test_movies_grouped_and_flat() {
        let store = catalog();
        let grouped = compute(&store, &view(Category::Movies));
        assert_eq!(ids(&grouped), vec!["F1", "H1"]);

        let flat = ViewState {
            group_by_collection: false,
            ..view(Category::Movies)
        };
        assert_eq!(ids(&compute(&store, &flat)), vec!["A1", "A2", "H1"]);
    }

    #[test]
    fn test_continue_watching() {
        let store = catalog();
        let result = compute(&store, &view(Category::ContinueWatching));
        assert_eq!(ids(&result), vec!["E1"]);
    }

    #[test]
    fn test_unrecognized_category_is_empty() {
        let store = catalog();
        assert!(compute(&store, &ViewState::default()).is_empty());
    }

    #[test]
    fn test_collapse_invariant() {
        let store = catalog();
        for category in [Category::Movies, Category::Series] {
            let result = compute(&store, &view(category));
            let shown: HashSet<&str> = result
                .iter()
                .filter_map(ResultEntry::as_collection)
                .map(|c| c.id.as_str())
                .collect();
            for media in result.iter().filter_map(ResultEntry::as_media) {
                assert!(
                    media
                        .collection_id
                        .as_deref()
                        .is_none_or(|id| !shown.contains(id))
                );
            }
        }
    }

    #[test]
    fn test_facet_monotonicity() {
        let store = catalog();
        let base = ViewState {
            group_by_collection: false,
            ..view(Category::Movies)
        };
        let before: HashSet<String> = compute(&store, &base)
            .iter()
            .map(|e| e.id().to_string())
            .collect();

        let mut narrowed = base.clone();
        narrowed.selected_genres.insert("Horror".to_string());
        let after_genre = compute(&store, &narrowed);
        assert_eq!(ids(&after_genre), vec!["A1", "A2"]);

        narrowed.selected_eras.insert("1970's".to_string());
        let after_era = compute(&store, &narrowed);
        for entry in after_genre.iter().chain(after_era.iter()) {
            assert!(before.contains(entry.id()));
        }
    }

    #[test]
    fn test_search_then_facets() {
        let store = catalog();
        let view = ViewState {
            search_text: "alien".to_string(),
            show_top_rated: true,
            ..view(Category::Movies)
        };
        let result = compute(&store, &view);
        assert_eq!(ids(&result), vec!["F1"]);
    }

    #[test]
    fn test_producer_all_sentinel_is_no_filter() {
        let store = catalog();
        let all = ViewState {
            selected_producer: "All".to_string(),
            ..view(Category::Movies)
        };
        assert_eq!(compute(&store, &all), compute(&store, &view(Category::Movies)));

        let warner = ViewState {
            selected_producer: "Warner".to_string(),
            ..view(Category::Movies)
        };
        assert_eq!(ids(&compute(&store, &warner)), vec!["H1"]);
    }
}
