use crate::config::FeedConfig;
use crate::db::Store;
use crate::error::Result;
use crate::paging::{ArticleFeed, PagingCoordinator};
use crate::remote::{PageSource, SpaceflightNewsClient};

/// Composition root for the feed: wires the remote page source, the local
/// store, and the paging policy together behind one entry point.
pub struct FeedRepository<S: PageSource> {
    remote: S,
    store: Store,
    config: FeedConfig,
}

impl FeedRepository<SpaceflightNewsClient> {
    /// Open the repository with the production HTTP client and an on-disk
    /// store at the configured path.
    pub async fn open(config: FeedConfig) -> Result<Self> {
        let remote = SpaceflightNewsClient::new(&config.api_base_url)?;
        let store = Store::new(&config.db_path).await?;
        Ok(Self::with_parts(remote, store, config))
    }
}

impl<S: PageSource + Clone> FeedRepository<S> {
    /// Assemble a repository from already-built collaborators. Tests use
    /// this to swap the remote source for a scripted one.
    pub fn with_parts(remote: S, store: Store, config: FeedConfig) -> Self {
        Self {
            remote,
            store,
            config,
        }
    }

    /// Begin observing the paged feed. Each call returns a fresh,
    /// restartable subscription; drive it with `init()` and the look-ahead
    /// trigger.
    pub fn observe_articles(&self) -> ArticleFeed<S> {
        let coordinator = PagingCoordinator::new(
            self.remote.clone(),
            self.store.clone(),
            self.config.page_size,
            self.config.cache_timeout(),
        );
        ArticleFeed::new(coordinator, self.store.clone(), self.config.prefetch_distance)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
