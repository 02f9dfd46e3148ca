pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod paging;
pub mod remote;
pub mod repository;

pub use config::FeedConfig;
pub use db::Store;
pub use error::{FeedError, Result};
pub use models::{Article, PageKey};
pub use paging::{
    ArticleFeed, InitializeAction, LoadDirection, LoadOutcome, LoadState, PagingCoordinator,
};
pub use remote::{PageSource, SpaceflightNewsClient};
pub use repository::FeedRepository;
