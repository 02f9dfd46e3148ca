use chrono::{DateTime, Utc};

/// A single feed item. Articles are immutable values: updates from the
/// network are full replace-on-conflict upserts keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image_url: Option<String>,
    /// Canonical presentation sort key, newest first.
    pub published_at: DateTime<Utc>,
}
