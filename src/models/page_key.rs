use chrono::{DateTime, Utc};

/// Per-article pagination bookkeeping. One row exists for every cached
/// article; the two are written and cleared together, never independently.
///
/// `next_page` is absent exactly when the article's page was the last one
/// the remote source returned. The most recent `written_at` across the
/// table acts as the freshness epoch for the whole cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PageKey {
    pub article_id: i64,
    pub previous_page: Option<u32>,
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub written_at: DateTime<Utc>,
}
