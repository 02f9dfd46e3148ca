use async_trait::async_trait;

use crate::error::Result;
use crate::models::Article;

/// The remote paged API. One batch per call, addressed by limit/offset;
/// an empty batch means pagination is exhausted.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Article>>;
}
