//! Stateful navigation engine
//!
//! The `Navigator` owns the catalog, the current `ViewState` and the published
//! result list. Every mutator runs the full pipeline to completion before it
//! returns, so the result is never stale when read. Changes are reported to an
//! optional listener as `NavigatorEvent`s.

use crate::catalog::{
    CatalogStore, Collection, MediaDataPayload, MediaItem, ResultEntry, WatchMetadata,
};
use crate::facets::{self, GenreOption};
use crate::pipeline;
use crate::sequencer::{EpisodeSequencer, EpisodeType};
use crate::view_state::{Category, SortKey, ViewState};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Change notification emitted by the navigator
///
/// A field event is always followed by `ResultChanged` once the result list
/// has been recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    CollectionsChanged,
    MediaChanged,
    MetadataChanged,
    /// Watch metadata was merged; the catalog is ready for browsing
    CatalogLoaded,
    CategoryChanged,
    SelectedCollectionChanged,
    SelectedGenresChanged,
    SelectedErasChanged,
    SelectedProducerChanged,
    ShowTopRatedChanged,
    GroupByCollectionChanged,
    SortByChanged,
    SortOrderChanged,
    SearchTextChanged,
    ResultChanged { count: usize },
}

type Listener = Box<dyn FnMut(&NavigatorEvent) + Send>;

/// Catalog navigation engine
///
/// Not safe for concurrent mutation; callers sharing one instance wrap the
/// whole navigator in a single `Mutex`.
pub struct Navigator {
    catalog: CatalogStore,
    view: ViewState,
    result: Vec<ResultEntry>,
    listener: Option<Listener>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::with_view(ViewState::default())
    }

    /// Creates a navigator starting from the given view parameters
    pub fn with_view(view: ViewState) -> Self {
        Self {
            catalog: CatalogStore::new(),
            view,
            result: Vec::new(),
            listener: None,
        }
    }

    /// Registers the closure that receives change notifications
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_navigator::{Navigator, NavigatorEvent};
    ///
    /// let mut navigator = Navigator::new();
    /// navigator.set_listener(|event| {
    ///     if let NavigatorEvent::ResultChanged { count } = event {
    ///         println!("{} entries", count);
    ///     }
    /// });
    /// navigator.set_current_category("movies");
    /// ```
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&NavigatorEvent) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    // Raw data and published result

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn collections(&self) -> &[Collection] {
        self.catalog.collections()
    }

    pub fn media(&self) -> &[MediaItem] {
        self.catalog.media()
    }

    pub fn metadata(&self) -> &HashMap<String, WatchMetadata> {
        self.catalog.metadata()
    }

    /// The ordered entries the UI should display
    pub fn result(&self) -> &[ResultEntry] {
        &self.result
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn current_category(&self) -> &Category {
        &self.view.current_category
    }

    pub fn selected_collection_id(&self) -> &str {
        &self.view.selected_collection_id
    }

    pub fn selected_genres(&self) -> &BTreeSet<String> {
        &self.view.selected_genres
    }

    pub fn selected_eras(&self) -> &BTreeSet<String> {
        &self.view.selected_eras
    }

    pub fn selected_producer(&self) -> &str {
        &self.view.selected_producer
    }

    pub fn show_top_rated(&self) -> bool {
        self.view.show_top_rated
    }

    pub fn group_by_collection(&self) -> bool {
        self.view.group_by_collection
    }

    pub fn sort_by(&self) -> SortKey {
        self.view.sort_by
    }

    pub fn sort_ascending(&self) -> bool {
        self.view.sort_ascending
    }

    pub fn search_text(&self) -> &str {
        &self.view.search_text
    }

    // Catalog input from the fetch collaborator

    pub fn replace_collections(&mut self, collections: Vec<Collection>) {
        debug!(count = collections.len(), "Replacing collections");
        self.catalog.replace_collections(collections);
        self.emit(NavigatorEvent::CollectionsChanged);
        self.recompute();
    }

    pub fn replace_media(&mut self, media: Vec<MediaItem>) {
        debug!(count = media.len(), "Replacing media items");
        self.catalog.replace_media(media);
        self.emit(NavigatorEvent::MediaChanged);
        self.recompute();
    }

    /// Replaces collections and media from one download with a single recomputation
    ///
    /// Emits `CollectionsChanged` and `MediaChanged`, then `ResultChanged`.
    ///
    /// # Arguments
    ///
    /// * `payload` - Decoded `media_data` document, see `parse_media_data`
    pub fn load_media_data(&mut self, payload: MediaDataPayload) {
        debug!(
            collections = payload.collections.len(),
            media = payload.media.len(),
            "Loading media data"
        );
        self.catalog.replace_collections(payload.collections);
        self.catalog.replace_media(payload.media);
        self.emit(NavigatorEvent::CollectionsChanged);
        self.emit(NavigatorEvent::MediaChanged);
        self.recompute();
    }

    /// Upserts watch metadata by media ID
    ///
    /// Records for items no longer in the catalog are kept. Emits
    /// `MetadataChanged`, `ResultChanged` and finally `CatalogLoaded`.
    pub fn merge_metadata(&mut self, entries: Vec<WatchMetadata>) {
        let merged = self.catalog.merge_metadata(entries);
        debug!(merged, total = self.catalog.metadata().len(), "Merged watch metadata");
        self.emit(NavigatorEvent::MetadataChanged);
        self.recompute();
        self.emit(NavigatorEvent::CatalogLoaded);
    }

    // View parameters

    /// Switches the browsing mode
    ///
    /// # Arguments
    ///
    /// * `category` - `"continueWatching"`, `"movies"`, `"series"` or a `Category`.
    ///   Other values are kept but select nothing.
    ///
    /// Setting the current value again does nothing and emits no event.
    pub fn set_current_category<C>(&mut self, category: C)
    where
        C: Into<Category>,
    {
        let category = category.into();
        if self.view.current_category != category {
            self.view.current_category = category;
            self.view_changed(NavigatorEvent::CategoryChanged);
        }
    }

    /// Browses into a collection; an empty ID returns to the catalog-wide view
    pub fn set_selected_collection_id<S>(&mut self, collection_id: S)
    where
        S: Into<String>,
    {
        let collection_id = collection_id.into();
        if self.view.selected_collection_id != collection_id {
            self.view.selected_collection_id = collection_id;
            self.view_changed(NavigatorEvent::SelectedCollectionChanged);
        }
    }

    pub fn set_selected_genres<I, S>(&mut self, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let genres: BTreeSet<String> = genres.into_iter().map(Into::into).collect();
        if self.view.selected_genres != genres {
            self.view.selected_genres = genres;
            self.view_changed(NavigatorEvent::SelectedGenresChanged);
        }
    }

    pub fn set_selected_eras<I, S>(&mut self, eras: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let eras: BTreeSet<String> = eras.into_iter().map(Into::into).collect();
        if self.view.selected_eras != eras {
            self.view.selected_eras = eras;
            self.view_changed(NavigatorEvent::SelectedErasChanged);
        }
    }

    /// Filters by producer; empty or `"All"` disables the filter
    pub fn set_selected_producer<S>(&mut self, producer: S)
    where
        S: Into<String>,
    {
        let producer = producer.into();
        if self.view.selected_producer != producer {
            self.view.selected_producer = producer;
            self.view_changed(NavigatorEvent::SelectedProducerChanged);
        }
    }

    pub fn set_show_top_rated(&mut self, show_top_rated: bool) {
        if self.view.show_top_rated != show_top_rated {
            self.view.show_top_rated = show_top_rated;
            self.view_changed(NavigatorEvent::ShowTopRatedChanged);
        }
    }

    pub fn set_group_by_collection(&mut self, group_by_collection: bool) {
        if self.view.group_by_collection != group_by_collection {
            self.view.group_by_collection = group_by_collection;
            self.view_changed(NavigatorEvent::GroupByCollectionChanged);
        }
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        if self.view.sort_by != sort_by {
            self.view.sort_by = sort_by;
            self.view_changed(NavigatorEvent::SortByChanged);
        }
    }

    /// true = ascending
    pub fn set_sort_ascending(&mut self, ascending: bool) {
        if self.view.sort_ascending != ascending {
            self.view.sort_ascending = ascending;
            self.view_changed(NavigatorEvent::SortOrderChanged);
        }
    }

    pub fn set_search_text<S>(&mut self, search_text: S)
    where
        S: Into<String>,
    {
        let search_text = search_text.into();
        if self.view.search_text != search_text {
            self.view.search_text = search_text;
            self.view_changed(NavigatorEvent::SearchTextChanged);
        }
    }

    /// Resets genre, era, producer and top-rated facets
    ///
    /// Category and collection selection are left alone.
    pub fn clear_filters(&mut self) {
        let mut changed = Vec::new();
        if !self.view.selected_genres.is_empty() {
            self.view.selected_genres.clear();
            changed.push(NavigatorEvent::SelectedGenresChanged);
        }
        if !self.view.selected_eras.is_empty() {
            self.view.selected_eras.clear();
            changed.push(NavigatorEvent::SelectedErasChanged);
        }
        if !self.view.selected_producer.is_empty() {
            self.view.selected_producer.clear();
            changed.push(NavigatorEvent::SelectedProducerChanged);
        }
        if self.view.show_top_rated {
            self.view.show_top_rated = false;
            changed.push(NavigatorEvent::ShowTopRatedChanged);
        }

        if changed.is_empty() {
            return;
        }
        for event in changed {
            self.emit(event);
        }
        self.recompute();
    }

    // Queries

    pub fn unique_genres(&self) -> Vec<GenreOption> {
        facets::unique_genres(&self.catalog)
    }

    pub fn unique_producers(&self) -> Vec<String> {
        facets::unique_producers(&self.catalog)
    }

    /// Display title of a media item, prefixed `[S<season> EP<episode>] ` for episodes
    pub fn media_title(&self, media_id: &str) -> Option<String> {
        let media = self.catalog.media_item(media_id)?;
        if media.is_episode() {
            Some(format!(
                "[S{} EP{}] {}",
                media.season, media.episode, media.title
            ))
        } else {
            Some(media.title.clone())
        }
    }

    pub fn collection(&self, collection_id: &str) -> Option<&Collection> {
        self.catalog.collection(collection_id)
    }

    /// Member items of a collection, in catalog order
    pub fn media_in_collection(&self, collection_id: &str) -> Vec<&MediaItem> {
        self.catalog.members(collection_id).collect()
    }

    /// Watch progress of an item, 0.0 when unknown
    pub fn media_progress(&self, media_id: &str) -> f64 {
        self.catalog.progress(media_id)
    }

    /// Full watch metadata of an item, including audio and subtitle choice
    pub fn media_metadata(&self, media_id: &str) -> Option<&WatchMetadata> {
        self.catalog.watch_metadata(media_id)
    }

    // Episode sequencing

    /// Sequencer over an explicitly named collection
    pub fn sequencer_for<'a>(&'a self, collection_id: &'a str) -> EpisodeSequencer<'a> {
        EpisodeSequencer::new(&self.catalog, collection_id)
    }

    /// Sequencer over the collection that contains `media_id`
    ///
    /// The browsed collection wins; without one, the item's own collection is used.
    fn sequencer_around<'a>(&'a self, media_id: &str) -> Option<EpisodeSequencer<'a>> {
        let collection_id = match self.view.selected_collection() {
            Some(selected) => selected,
            None => self.catalog.media_item(media_id)?.collection_id.as_deref()?,
        };
        Some(self.sequencer_for(collection_id))
    }

    /// Final episode of the browsed collection
    pub fn final_episode(&self) -> Option<&str> {
        let selected = self.view.selected_collection()?;
        self.sequencer_for(selected).final_episode()
    }

    /// Episode `offset` positions away from `current_id`; negative goes back
    ///
    /// # Arguments
    ///
    /// * `current_id` - ID of the playing episode
    /// * `offset` - Distance in episode numbers, usually `1` or `-1`
    ///
    /// # Returns
    ///
    /// The neighbouring episode in the browsed collection, or in the item's
    /// own collection when none is browsed. `None` when there is no such episode.
    pub fn next_episode(&self, current_id: &str, offset: i32) -> Option<&str> {
        self.sequencer_around(current_id)?
            .next_episode(current_id, offset)
    }

    /// Classifies an item as first, middle or final episode
    ///
    /// # Arguments
    ///
    /// * `current_id` - ID of the media item to classify
    ///
    /// # Returns
    ///
    /// `NoEpisode` for unknown IDs and for anything that is not an episode.
    /// Episode 1 is always `FirstEpisode`. Other episodes are `FinalEpisode`
    /// when they close their collection, and `MiddleEpisode` otherwise,
    /// including episodes that have no collection to compare against.
    pub fn episode_type(&self, current_id: &str) -> EpisodeType {
        let Some(current) = self.catalog.media_item(current_id) else {
            return EpisodeType::NoEpisode;
        };
        if !current.is_episode() {
            return EpisodeType::NoEpisode;
        }
        if current.episode == 1 {
            return EpisodeType::FirstEpisode;
        }
        self.sequencer_around(current_id)
            .map(|sequencer| sequencer.episode_type(current_id))
            .unwrap_or(EpisodeType::MiddleEpisode)
    }

    fn view_changed(&mut self, event: NavigatorEvent) {
        self.emit(event);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.result = pipeline::compute(&self.catalog, &self.view);
        let count = self.result.len();
        self.emit(NavigatorEvent::ResultChanged { count });
    }

    fn emit(&mut self, event: NavigatorEvent) {
        trace!(?event, "Navigator event");
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}
