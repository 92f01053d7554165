//! Collection/item collapsing
//!
//! A shown collection stands in for its member items, so members of a
//! surviving collection are removed from the media side.

use super::WorkingSet;
use crate::catalog::ResultEntry;
use crate::view_state::{Category, ViewState};
use std::collections::HashSet;

pub(crate) fn collapse(set: WorkingSet<'_>, view: &ViewState) -> Vec<ResultEntry> {
    let WorkingSet {
        mut media,
        mut collections,
    } = set;

    let collections_shown = view.current_category != Category::ContinueWatching
        && view.selected_collection().is_none();

    if !collections_shown {
        collections.clear();
    } else if !view.group_by_collection && view.current_category == Category::Movies {
        // Flat movie view
        collections.clear();
    } else {
        let shown: HashSet<&str> = collections.iter().map(|c| c.id.as_str()).collect();
        media.retain(|m| {
            m.collection_id
                .as_deref()
                .is_none_or(|id| !shown.contains(id))
        });
    }

    media
        .into_iter()
        .map(|m| ResultEntry::Media(m.clone()))
        .chain(collections.into_iter().map(|c| ResultEntry::Collection(c.clone())))
        .collect()
}
