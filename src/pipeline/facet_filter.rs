//! Genre, era, producer and top-rated facets
//!
//! An entity is kept iff it passes every active facet. Media items and
//! collections are filtered independently.

use super::WorkingSet;
use crate::catalog::{CatalogStore, Collection, MediaItem};
use crate::facets::era_from_year;
use crate::view_state::{TOP_RATED_THRESHOLD, ViewState};
use std::collections::BTreeSet;

pub(crate) fn apply(set: &mut WorkingSet<'_>, catalog: &CatalogStore, view: &ViewState) {
    if !view.has_active_facets() {
        return;
    }
    set.media
        .retain(|media| media_passes(media, catalog, view));
    set.collections
        .retain(|collection| collection_passes(collection, catalog, view));
}

/// Checks a media item against every active facet
///
/// The genre facet also accepts the parent collection's genres.
pub fn media_passes(media: &MediaItem, catalog: &CatalogStore, view: &ViewState) -> bool {
    if !view.selected_genres.is_empty() {
        let parent_matches = catalog
            .parent_of(media)
            .is_some_and(|parent| parent.genres.intersects(&view.selected_genres));
        if !media.genres.intersects(&view.selected_genres) && !parent_matches {
            return false;
        }
    }

    if !era_matches(media.year, &view.selected_eras) {
        return false;
    }

    if let Some(producer) = view.producer_filter() {
        if media.producer != producer {
            return false;
        }
    }

    !view.show_top_rated || media.rating >= TOP_RATED_THRESHOLD
}

/// Checks a collection against every active facet
///
/// Genre and producer also match through any member item. Era and rating
/// use the collection's own values.
pub fn collection_passes(collection: &Collection, catalog: &CatalogStore, view: &ViewState) -> bool {
    if !view.selected_genres.is_empty() {
        let member_matches = catalog
            .members(&collection.id)
            .any(|m| m.genres.intersects(&view.selected_genres));
        if !collection.genres.intersects(&view.selected_genres) && !member_matches {
            return false;
        }
    }

    if !era_matches(collection.year, &view.selected_eras) {
        return false;
    }

    if let Some(producer) = view.producer_filter() {
        let member_matches = catalog.members(&collection.id).any(|m| m.producer == producer);
        if collection.producer != producer && !member_matches {
            return false;
        }
    }

    !view.show_top_rated || collection.collection_rating >= TOP_RATED_THRESHOLD
}

fn era_matches(year: i32, selected_eras: &BTreeSet<String>) -> bool {
    if selected_eras.is_empty() {
        return true;
    }
    era_from_year(year).is_some_and(|era| selected_eras.contains(&era))
}
