#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use spacefeed::db::store::{insert_articles, insert_page_keys};
use spacefeed::{Article, FeedError, PageKey, PageSource, Result, Store};

/// Scripted page source: a fixed list of pages addressed by
/// `offset / limit`, anything past the script is an empty batch.
#[derive(Clone)]
pub struct FakePageSource {
    pages: Arc<Vec<Vec<Article>>>,
    calls: Arc<AtomicUsize>,
    fail_next: Arc<AtomicBool>,
    last_request: Arc<Mutex<Option<(u32, u32)>>>,
}

impl FakePageSource {
    pub fn new(pages: Vec<Vec<Article>>) -> Self {
        Self {
            pages: Arc::new(pages),
            calls: Arc::new(AtomicUsize::new(0)),
            fail_next: Arc::new(AtomicBool::new(false)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next fetch fail with a protocol error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// The `(limit, offset)` of the most recent fetch.
    pub fn last_request(&self) -> Option<(u32, u32)> {
        *self.last_request.lock().unwrap()
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((limit, offset));

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FeedError::Protocol("simulated network failure".into()));
        }

        let index = (offset / limit) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

/// Deterministic article: lower ids publish later, so the newest-first
/// range query returns ids in ascending order.
pub fn article(id: i64) -> Article {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Article {
        id,
        title: format!("Article {id}"),
        summary: format!("Summary for article {id}"),
        url: format!("https://example.com/articles/{id}"),
        image_url: None,
        published_at: base - Duration::seconds(id),
    }
}

/// A page of `count` articles with ids starting at `first_id`.
pub fn page(first_id: i64, count: i64) -> Vec<Article> {
    (first_id..first_id + count).map(article).collect()
}

/// Seed the store with one cached article whose page key epoch is `age`
/// in the past.
pub async fn seed_cache_with_age(store: &Store, age: Duration) {
    let written_at = Utc::now() - age;
    let articles = vec![article(1)];
    let keys = vec![PageKey {
        article_id: 1,
        previous_page: None,
        current_page: 1,
        next_page: Some(2),
        written_at,
    }];

    store
        .run_transaction(move |tx| {
            insert_page_keys(tx, &keys)?;
            insert_articles(tx, &articles)?;
            Ok(())
        })
        .await
        .unwrap();
}
