//! User-chosen view parameters
//!
//! `ViewState` is the full parameter set the navigation pipeline is computed
//! from. Every field has a matching setter on the `Navigator`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Producer filter value meaning "no producer filter"
pub const ALL_PRODUCERS: &str = "All";

/// Minimum rating for the top-rated facet
pub const TOP_RATED_THRESHOLD: f64 = 8.0;

/// Errors that can occur while parsing view parameters from text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewStateError {
    /// The sort key is not one of `title`, `year` or `rating`
    #[error("Unknown sort key: {0} (expected title, year or rating)")]
    UnknownSortKey(String),
}

/// Top-level browsing mode
///
/// Values the client does not know are kept verbatim so they can be read back,
/// but they select nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    ContinueWatching,
    Movies,
    Series,
    Unrecognized(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ContinueWatching => "continueWatching",
            Self::Movies => "movies",
            Self::Series => "series",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        match raw {
            "continueWatching" => Self::ContinueWatching,
            "movies" => Self::Movies,
            "series" => Self::Series,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key for the catalog-wide view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Title,
    Year,
    Rating,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::Rating => "rating",
        }
    }
}

impl FromStr for SortKey {
    type Err = ViewStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "year" => Ok(Self::Year),
            "rating" => Ok(Self::Rating),
            other => Err(ViewStateError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable parameter set the result list is computed from
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub current_category: Category,
    /// Empty means no collection is being browsed
    pub selected_collection_id: String,
    pub selected_genres: BTreeSet<String>,
    /// Decade labels such as `"1990's"`
    pub selected_eras: BTreeSet<String>,
    /// Empty or `ALL_PRODUCERS` disables the producer facet
    pub selected_producer: String,
    pub show_top_rated: bool,
    pub group_by_collection: bool,
    pub sort_by: SortKey,
    /// true = ascending
    pub sort_ascending: bool,
    pub search_text: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_category: Category::default(),
            selected_collection_id: String::new(),
            selected_genres: BTreeSet::new(),
            selected_eras: BTreeSet::new(),
            selected_producer: String::new(),
            show_top_rated: false,
            group_by_collection: true,
            sort_by: SortKey::Title,
            sort_ascending: true,
            search_text: String::new(),
        }
    }
}

impl ViewState {
    /// The collection being browsed, if any
    pub fn selected_collection(&self) -> Option<&str> {
        if self.selected_collection_id.is_empty() {
            None
        } else {
            Some(&self.selected_collection_id)
        }
    }

    /// The active producer filter, if any
    pub fn producer_filter(&self) -> Option<&str> {
        if self.selected_producer.is_empty() || self.selected_producer == ALL_PRODUCERS {
            None
        } else {
            Some(&self.selected_producer)
        }
    }

    /// True when any facet (genre, era, producer, top-rated) is active
    pub fn has_active_facets(&self) -> bool {
        !self.selected_genres.is_empty()
            || !self.selected_eras.is_empty()
            || self.producer_filter().is_some()
            || self.show_top_rated
    }
}
