//! Category eligibility and selected-collection restriction

use super::WorkingSet;
use crate::catalog::{CatalogStore, CollectionType, MediaType};
use crate::view_state::Category;

/// Progress above this counts as finished
pub const FINISHED_THRESHOLD: f64 = 0.99;

/// True for items that were started but not finished
pub fn is_in_progress(progress: f64) -> bool {
    progress > 0.0 && progress <= FINISHED_THRESHOLD
}

/// Selects the media items and collections that belong to a category
///
/// Unrecognized categories select nothing.
pub(crate) fn classify<'a>(catalog: &'a CatalogStore, category: &Category) -> WorkingSet<'a> {
    let (media_type, collection_type) = match category {
        Category::ContinueWatching => {
            let media = catalog
                .media()
                .iter()
                .filter(|m| is_in_progress(catalog.progress(&m.id)))
                .collect();
            return WorkingSet {
                media,
                collections: Vec::new(),
            };
        }
        Category::Movies => (MediaType::Movie, CollectionType::Movies),
        Category::Series => (MediaType::Episode, CollectionType::Serie),
        Category::Unrecognized(_) => return WorkingSet::default(),
    };

    WorkingSet {
        media: catalog
            .media()
            .iter()
            .filter(|m| m.media_type == media_type)
            .collect(),
        collections: catalog
            .collections()
            .iter()
            .filter(|c| c.collection_type == collection_type)
            .collect(),
    }
}

/// Narrows the working set to the members of the browsed collection
///
/// While a single collection is browsed no collection entries are shown.
pub(crate) fn restrict_to_collection(set: &mut WorkingSet<'_>, selected: Option<&str>) {
    if let Some(collection_id) = selected {
        set.collections.clear();
        set.media.retain(|m| m.belongs_to(collection_id));
    }
}
