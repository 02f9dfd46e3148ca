mod coordinator;
mod feed;

pub use coordinator::{InitializeAction, LoadDirection, LoadOutcome, PagingCoordinator};
pub use feed::{ArticleFeed, LoadState};
