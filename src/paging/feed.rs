use std::sync::Arc;

use crate::db::Store;
use crate::error::FeedError;
use crate::models::Article;
use crate::remote::PageSource;

use super::coordinator::{InitializeAction, LoadDirection, PagingCoordinator};

/// Load progress for one axis of the feed (initial/refresh or append).
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Error(Arc<FeedError>),
    EndOfData,
}

impl LoadState {
    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }
}

/// One paged subscription to the article feed: the materialized window of
/// cached articles plus independent load states for the refresh and append
/// axes.
///
/// All loading goes through `&mut self`, so at most one fetch-and-merge
/// cycle runs at a time for a given subscription. Dropping the feed and
/// calling `FeedRepository::observe_articles` again restarts from
/// `init()`.
pub struct ArticleFeed<S: PageSource> {
    coordinator: PagingCoordinator<S>,
    store: Store,
    prefetch_distance: usize,
    loaded: Vec<Article>,
    refresh_state: LoadState,
    append_state: LoadState,
    initialized: bool,
}

impl<S: PageSource> ArticleFeed<S> {
    pub(crate) fn new(
        coordinator: PagingCoordinator<S>,
        store: Store,
        prefetch_distance: usize,
    ) -> Self {
        Self {
            coordinator,
            store,
            prefetch_distance,
            loaded: Vec::new(),
            refresh_state: LoadState::Idle,
            append_state: LoadState::Idle,
            initialized: false,
        }
    }

    /// Start the subscription: serve the cache as-is when it is still
    /// fresh, otherwise refresh from page 1 first.
    pub async fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match self.coordinator.initialize().await {
            Ok(InitializeAction::SkipInitialRefresh) => {
                if let Err(e) = self.materialize().await {
                    self.refresh_state = LoadState::Error(Arc::new(e));
                }
            }
            Ok(InitializeAction::LaunchInitialRefresh) => self.refresh().await,
            Err(e) => self.refresh_state = LoadState::Error(Arc::new(e)),
        }
    }

    /// Manual refresh: reset the cache to page 1. A failed refresh leaves
    /// the previously cached window visible.
    pub async fn refresh(&mut self) {
        if matches!(self.refresh_state, LoadState::Loading) {
            return;
        }
        self.refresh_state = LoadState::Loading;

        match self.coordinator.load(LoadDirection::Refresh, None).await {
            Ok(outcome) => {
                if let Err(e) = self.materialize().await {
                    self.refresh_state = LoadState::Error(Arc::new(e));
                    return;
                }
                self.refresh_state = LoadState::Idle;
                self.append_state = if outcome.end_of_pagination {
                    LoadState::EndOfData
                } else {
                    LoadState::Idle
                };
            }
            Err(e) => self.refresh_state = LoadState::Error(Arc::new(e)),
        }
    }

    /// Append the next page after the last loaded item.
    pub async fn load_more(&mut self) {
        if matches!(self.append_state, LoadState::Loading | LoadState::EndOfData) {
            return;
        }
        self.append_state = LoadState::Loading;

        let last_seen = self.loaded.last().map(|article| article.id);
        match self.coordinator.load(LoadDirection::Append, last_seen).await {
            Ok(outcome) => {
                if let Err(e) = self.materialize().await {
                    self.append_state = LoadState::Error(Arc::new(e));
                    return;
                }
                self.append_state = if outcome.end_of_pagination {
                    LoadState::EndOfData
                } else {
                    LoadState::Idle
                };
            }
            Err(e) => self.append_state = LoadState::Error(Arc::new(e)),
        }
    }

    /// Look-ahead trigger: call as the consumer's position moves through
    /// the window. Fetches the next page slightly before the consumer
    /// reaches the end of the loaded items.
    pub async fn notify_visible(&mut self, index: usize) {
        if index + self.prefetch_distance + 1 >= self.loaded.len() {
            self.load_more().await;
        }
    }

    /// Re-issue whichever axis last failed. Does nothing when neither is
    /// in an error state.
    pub async fn retry(&mut self) {
        if self.refresh_state.is_error() {
            self.refresh_state = LoadState::Idle;
            self.refresh().await;
        } else if self.append_state.is_error() {
            self.append_state = LoadState::Idle;
            self.load_more().await;
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.loaded
    }

    pub fn refresh_state(&self) -> &LoadState {
        &self.refresh_state
    }

    pub fn append_state(&self) -> &LoadState {
        &self.append_state
    }

    /// The cache only ever holds the loaded window, so the full range query
    /// is exactly the consumer's visible sequence.
    async fn materialize(&mut self) -> crate::error::Result<()> {
        self.loaded = self.store.articles_newest_first().await?;
        Ok(())
    }
}
