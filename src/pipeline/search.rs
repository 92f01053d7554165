//! Free-text search over the working set

use super::WorkingSet;
use crate::catalog::{CatalogStore, Collection, MediaItem};

/// Keeps entities with any text field containing `search_text`, ignoring case
///
/// Media items are matched together with their parent collection's title so
/// that searching a series name finds its episodes. Empty text keeps everything.
pub(crate) fn filter_by_text(set: &mut WorkingSet<'_>, catalog: &CatalogStore, search_text: &str) {
    if search_text.is_empty() {
        return;
    }
    let needle = search_text.to_lowercase();

    set.media.retain(|media| {
        let parent_title = catalog
            .parent_of(media)
            .map(|c| c.collection_title.as_str());
        any_contains(media_fields(media).chain(parent_title), &needle)
    });
    set.collections
        .retain(|collection| any_contains(collection_fields(collection), &needle));
}

fn any_contains<'a>(fields: impl IntoIterator<Item = &'a str>, needle: &str) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn media_fields(media: &MediaItem) -> impl Iterator<Item = &str> {
    [
        media.id.as_str(),
        media.media_type.as_str(),
        media.title.as_str(),
        media.collection_id.as_deref().unwrap_or_default(),
        media.producer.as_str(),
    ]
    .into_iter()
    .chain(media.genres.iter())
}

fn collection_fields(collection: &Collection) -> impl Iterator<Item = &str> {
    [
        collection.id.as_str(),
        collection.collection_title.as_str(),
        collection.collection_type.as_str(),
        collection.producer.as_str(),
    ]
    .into_iter()
    .chain(collection.genres.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CollectionType, Genres, MediaType};

    fn catalog() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_collections(vec![Collection {
            id: "C1".to_string(),
            collection_title: "Breaking Bad".to_string(),
            collection_type: CollectionType::Serie,
            genres: Genres::new(["Crime"]),
            ..Collection::default()
        }]);
        store.replace_media(vec![
            MediaItem {
                id: "E1".to_string(),
                media_type: MediaType::Episode,
                title: "Pilot".to_string(),
                collection_id: Some("C1".to_string()),
                ..MediaItem::default()
            },
            MediaItem {
                id: "M1".to_string(),
                media_type: MediaType::Movie,
                title: "Heat".to_string(),
                producer: "Warner Bros".to_string(),
                ..MediaItem::default()
            },
        ]);
        store
    }

    fn run(store: &CatalogStore, text: &str) -> (Vec<String>, Vec<String>) {
        let mut set = WorkingSet {
            media: store.media().iter().collect(),
            collections: store.collections().iter().collect(),
        };
        filter_by_text(&mut set, store, text);
        (
            set.media.iter().map(|m| m.id.clone()).collect(),
            set.collections.iter().map(|c| c.id.clone()).collect(),
        )
    }

    #[test]
    fn test_empty_text_keeps_all() {
        let store = catalog();
        assert_eq!(run(&store, "").0.len(), 2);
    }

    #[test]
    fn test_case_insensitive_title_match() {
        let store = catalog();
        assert_eq!(run(&store, "hEAT"), (vec!["M1".to_string()], vec![]));
    }

    #[test]
    fn test_parent_title_finds_episodes() {
        let store = catalog();
        let (media, collections) = run(&store, "breaking");
        assert_eq!(media, vec!["E1"]);
        assert_eq!(collections, vec!["C1"]);
    }

    #[test]
    fn test_matches_producer_and_genre() {
        let store = catalog();
        assert_eq!(run(&store, "warner").0, vec!["M1"]);
        assert_eq!(run(&store, "crime").1, vec!["C1"]);
    }
}
