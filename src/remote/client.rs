use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{FeedError, Result};
use crate::models::Article;

use super::PageSource;

/// The article payload as the Spaceflight News API returns it.
#[derive(Debug, Deserialize)]
struct ArticleDto {
    id: i64,
    url: String,
    title: String,
    summary: String,
    published_at: DateTime<Utc>,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    results: Vec<ArticleDto>,
}

impl From<ArticleDto> for Article {
    fn from(dto: ArticleDto) -> Self {
        Article {
            id: dto.id,
            title: dto.title,
            summary: dto.summary,
            url: dto.url,
            image_url: dto.image_url,
            published_at: dto.published_at,
        }
    }
}

/// HTTP page source backed by the Spaceflight News v4 API.
#[derive(Clone)]
pub struct SpaceflightNewsClient {
    client: Client,
    base_url: Url,
}

impl SpaceflightNewsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FeedError::Config(format!("invalid API base URL: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("spacefeed/1.0")
            .build()
            .map_err(FeedError::Transport)?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PageSource for SpaceflightNewsClient {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Article>> {
        let mut url = self
            .base_url
            .join("v4/articles/")
            .map_err(|e| FeedError::Config(format!("invalid articles URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Protocol(format!(
                "unexpected status {} from articles endpoint",
                response.status()
            )));
        }

        let body: ArticlesResponse = response.json().await?;
        Ok(body.results.into_iter().map(Article::from).collect())
    }
}
