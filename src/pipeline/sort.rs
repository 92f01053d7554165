//! Result ordering
//!
//! All sorts are stable: ties keep the order the earlier stages produced.

use crate::catalog::{CatalogStore, CollectionType, MediaItem, ResultEntry};
use crate::view_state::{Category, SortKey, ViewState};
use std::cmp::Ordering;

pub(crate) fn sort_entries(entries: &mut Vec<ResultEntry>, catalog: &CatalogStore, view: &ViewState) {
    let ascending = view.sort_ascending;

    if view.selected_collection().is_some() {
        // Inside one collection the category decides the order
        match view.current_category {
            Category::Series => entries.sort_by(|a, b| episode_key(a).cmp(&episode_key(b))),
            Category::Movies => {
                entries.sort_by(|a, b| directed(a.year().cmp(&b.year()), ascending))
            }
            _ => entries.sort_by(|a, b| directed(a.rating().total_cmp(&b.rating()), ascending)),
        }
        return;
    }

    match view.sort_by {
        SortKey::Title => entries.sort_by(|a, b| directed(a.title().cmp(b.title()), ascending)),
        SortKey::Year => {
            let mut keyed: Vec<(i32, ResultEntry)> = entries
                .drain(..)
                .map(|entry| (representative_year(&entry, catalog, ascending), entry))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| directed(a.cmp(b), ascending));
            entries.extend(keyed.into_iter().map(|(_, entry)| entry));
        }
        SortKey::Rating => {
            entries.sort_by(|a, b| directed(a.rating().total_cmp(&b.rating()), ascending))
        }
    }
}

fn directed(ordering: Ordering, ascending: bool) -> Ordering {
    if ascending { ordering } else { ordering.reverse() }
}

fn episode_key(entry: &ResultEntry) -> (i32, i32) {
    entry
        .as_media()
        .map(|m| (m.season, m.episode))
        .unwrap_or_default()
}

/// Year used to place an entry in a year-sorted list
///
/// # Arguments
///
/// * `entry` - The result entry to place
/// * `catalog` - Catalog holding the members of a collection entry
/// * `ascending` - Direction of the year sort the entry is placed in
///
/// # Returns
///
/// The entry's own year when it is positive. A collection without one takes
/// the year of its first member, with members ordered by season and episode
/// for a series and by year in the sort direction otherwise. A descending
/// sort therefore places a movie collection by its latest member.
pub fn representative_year(entry: &ResultEntry, catalog: &CatalogStore, ascending: bool) -> i32 {
    let year = entry.year();
    if year > 0 {
        return year;
    }
    let Some(collection) = entry.as_collection() else {
        return year;
    };

    let mut members: Vec<&MediaItem> = catalog.members(&collection.id).collect();
    if collection.collection_type == CollectionType::Serie {
        members.sort_by_key(|m| (m.season, m.episode));
    } else {
        members.sort_by(|a, b| directed(a.year.cmp(&b.year), ascending));
    }
    members.first().map(|m| m.year).unwrap_or(year)
}
