use chrono::Utc;

use crate::db::{store, Store};
use crate::error::Result;
use crate::models::PageKey;
use crate::remote::PageSource;

/// Whether a fresh subscription can serve the cache as-is or has to refresh
/// it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    SkipInitialRefresh,
    LaunchInitialRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDirection {
    /// Reset the cache and load page 1.
    Refresh,
    /// Load pages before the current window. Never fetches in this feed:
    /// a refresh always restarts from the top.
    Prepend,
    /// Load the page after the last loaded item.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub end_of_pagination: bool,
}

/// Decides when to hit the network, translates pagination requests into
/// limit/offset parameters, and merges each fetched page into the store
/// inside one transaction. Fetching fresh data happens when the cache has
/// timed out, when the consumer runs out of cached content, or on a manual
/// refresh.
pub struct PagingCoordinator<S: PageSource> {
    remote: S,
    store: Store,
    page_size: u32,
    cache_timeout: chrono::Duration,
}

impl<S: PageSource> PagingCoordinator<S> {
    pub fn new(remote: S, store: Store, page_size: u32, cache_timeout: chrono::Duration) -> Self {
        Self {
            remote,
            store,
            page_size,
            cache_timeout,
        }
    }

    /// Called once when a consumer starts observing the feed. Pure decision
    /// over the cache epoch and the wall clock; no side effects.
    pub async fn initialize(&self) -> Result<InitializeAction> {
        let epoch = self.store.latest_write_epoch().await?;
        tracing::debug!(?epoch, "cache epoch");

        match epoch {
            Some(epoch) if Utc::now() - epoch < self.cache_timeout => {
                tracing::debug!("skipping initial refresh because cache hasn't timed out yet");
                Ok(InitializeAction::SkipInitialRefresh)
            }
            _ => {
                tracing::debug!("cache is absent or stale, launching initial refresh");
                Ok(InitializeAction::LaunchInitialRefresh)
            }
        }
    }

    /// Run one load cycle. `last_seen` is the id of the last item the
    /// consumer has loaded; it resolves the next page for appends.
    ///
    /// The cycle has two strictly sequential phases: the network fetch
    /// (which may suspend for as long as the transport takes) and the
    /// synchronous transactional merge. No store access happens during the
    /// fetch and no blocking call happens inside the transaction.
    pub async fn load(
        &self,
        direction: LoadDirection,
        last_seen: Option<i64>,
    ) -> Result<LoadOutcome> {
        let page = match direction {
            LoadDirection::Refresh => 1,
            LoadDirection::Prepend => {
                return Ok(LoadOutcome {
                    end_of_pagination: true,
                });
            }
            LoadDirection::Append => {
                let key = match last_seen {
                    Some(id) => self.store.page_key(id).await?,
                    None => None,
                };
                match key {
                    Some(PageKey {
                        next_page: Some(next),
                        ..
                    }) => next,
                    // A key without a next page means pagination is
                    // exhausted.
                    Some(_) => {
                        return Ok(LoadOutcome {
                            end_of_pagination: true,
                        });
                    }
                    // No key at all means nothing has loaded yet; a later
                    // refresh will take care of it.
                    None => {
                        return Ok(LoadOutcome {
                            end_of_pagination: false,
                        });
                    }
                }
            }
        };

        let limit = self.page_size;
        let offset = page_offset(page, limit);

        tracing::debug!(page, limit, offset, "fetching articles from the remote source");
        let articles = self.remote.fetch_page(limit, offset).await?;
        let end_of_pagination = articles.is_empty();

        let refresh = direction == LoadDirection::Refresh;
        let written_at = Utc::now();
        let previous_page = (page > 1).then(|| page - 1);
        let next_page = (!end_of_pagination).then(|| page + 1);

        let keys: Vec<PageKey> = articles
            .iter()
            .map(|article| PageKey {
                article_id: article.id,
                previous_page,
                current_page: page,
                next_page,
                written_at,
            })
            .collect();

        self.store
            .run_transaction(move |tx| {
                if refresh {
                    tracing::debug!("clearing the article cache");
                    store::clear_articles(tx)?;
                    store::clear_page_keys(tx)?;
                }
                store::insert_page_keys(tx, &keys)?;
                store::insert_articles(tx, &articles)?;
                Ok(())
            })
            .await?;

        Ok(LoadOutcome { end_of_pagination })
    }
}

/// 1-based page number to the offset of its first item.
pub(crate) fn page_offset(page: u32, limit: u32) -> u32 {
    (page - 1) * limit
}
