mod common;

use chrono::Duration;
use common::{page, seed_cache_with_age, FakePageSource};
use spacefeed::db::store::insert_page_keys;
use spacefeed::{InitializeAction, LoadDirection, PageKey, PagingCoordinator, Store};

const PAGE_SIZE: u32 = 10;

fn coordinator(
    remote: FakePageSource,
    store: Store,
) -> PagingCoordinator<FakePageSource> {
    PagingCoordinator::new(remote, store, PAGE_SIZE, Duration::minutes(30))
}

#[tokio::test]
async fn refresh_always_targets_page_one() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10), page(11, 10)]);
    let coordinator = coordinator(remote.clone(), store);

    // Even with a last seen item deep into the feed, a refresh starts over.
    let outcome = coordinator
        .load(LoadDirection::Refresh, Some(999))
        .await
        .unwrap();

    assert!(!outcome.end_of_pagination);
    assert_eq!(remote.last_request(), Some((10, 0)));
}

#[tokio::test]
async fn refresh_writes_one_key_per_article() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10), page(11, 10)]);
    let coordinator = coordinator(remote, store.clone());

    coordinator
        .load(LoadDirection::Refresh, None)
        .await
        .unwrap();

    assert_eq!(store.article_count().await.unwrap(), 10);
    assert_eq!(store.page_key_count().await.unwrap(), 10);
    assert_eq!(store.orphan_count().await.unwrap(), 0);

    let key = store.page_key(5).await.unwrap().unwrap();
    assert_eq!(key.previous_page, None);
    assert_eq!(key.current_page, 1);
    assert_eq!(key.next_page, Some(2));
}

#[tokio::test]
async fn append_uses_the_next_page_of_the_last_item() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10), page(11, 10)]);
    let coordinator = coordinator(remote.clone(), store.clone());

    coordinator
        .load(LoadDirection::Refresh, None)
        .await
        .unwrap();
    coordinator
        .load(LoadDirection::Append, Some(10))
        .await
        .unwrap();

    assert_eq!(remote.last_request(), Some((10, 10)));
    assert_eq!(store.article_count().await.unwrap(), 20);

    let key = store.page_key(15).await.unwrap().unwrap();
    assert_eq!(key.previous_page, Some(1));
    assert_eq!(key.current_page, 2);
    assert_eq!(key.next_page, Some(3));
}

#[tokio::test]
async fn prepend_never_fetches() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10)]);
    let coordinator = coordinator(remote.clone(), store);

    let outcome = coordinator
        .load(LoadDirection::Prepend, Some(1))
        .await
        .unwrap();

    assert!(outcome.end_of_pagination);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn append_with_nothing_loaded_defers_without_fetching() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10)]);
    let coordinator = coordinator(remote.clone(), store);

    let outcome = coordinator.load(LoadDirection::Append, None).await.unwrap();

    // Nothing cached yet: not exhausted, just nothing to resume from.
    assert!(!outcome.end_of_pagination);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn append_past_the_last_page_reports_exhaustion_without_fetching() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10)]);
    let coordinator = coordinator(remote.clone(), store.clone());

    // A key with no next page marks the end of pagination at fetch time.
    let keys = vec![PageKey {
        article_id: 7,
        previous_page: Some(1),
        current_page: 2,
        next_page: None,
        written_at: chrono::Utc::now(),
    }];
    store
        .run_transaction(move |tx| insert_page_keys(tx, &keys))
        .await
        .unwrap();

    let outcome = coordinator
        .load(LoadDirection::Append, Some(7))
        .await
        .unwrap();

    assert!(outcome.end_of_pagination);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn empty_batch_leaves_no_next_page() {
    let store = Store::open_in_memory().await.unwrap();
    // Page 1 has content, page 2 is empty.
    let remote = FakePageSource::new(vec![page(1, 3)]);
    let coordinator = coordinator(remote, store.clone());

    let refresh = coordinator
        .load(LoadDirection::Refresh, None)
        .await
        .unwrap();
    assert!(!refresh.end_of_pagination);

    let append = coordinator
        .load(LoadDirection::Append, Some(3))
        .await
        .unwrap();
    assert!(append.end_of_pagination);

    // The empty cycle wrote nothing: still 3 articles, 3 keys.
    assert_eq!(store.article_count().await.unwrap(), 3);
    assert_eq!(store.page_key_count().await.unwrap(), 3);
}

#[tokio::test]
async fn initialize_launches_refresh_when_cache_is_stale() {
    let store = Store::open_in_memory().await.unwrap();
    seed_cache_with_age(&store, Duration::minutes(31)).await;
    let coordinator = coordinator(FakePageSource::new(vec![]), store);

    assert_eq!(
        coordinator.initialize().await.unwrap(),
        InitializeAction::LaunchInitialRefresh
    );
}

#[tokio::test]
async fn initialize_skips_refresh_when_cache_is_fresh() {
    let store = Store::open_in_memory().await.unwrap();
    seed_cache_with_age(&store, Duration::minutes(10)).await;
    let coordinator = coordinator(FakePageSource::new(vec![]), store);

    assert_eq!(
        coordinator.initialize().await.unwrap(),
        InitializeAction::SkipInitialRefresh
    );
}

#[tokio::test]
async fn initialize_launches_refresh_when_cache_is_empty() {
    let store = Store::open_in_memory().await.unwrap();
    let coordinator = coordinator(FakePageSource::new(vec![]), store);

    assert_eq!(
        coordinator.initialize().await.unwrap(),
        InitializeAction::LaunchInitialRefresh
    );
}

#[tokio::test]
async fn fetch_failure_leaves_the_store_untouched() {
    let store = Store::open_in_memory().await.unwrap();
    let remote = FakePageSource::new(vec![page(1, 10)]);
    let coordinator = coordinator(remote.clone(), store.clone());

    coordinator
        .load(LoadDirection::Refresh, None)
        .await
        .unwrap();
    remote.fail_next();

    let result = coordinator.load(LoadDirection::Refresh, None).await;

    assert!(result.is_err());
    // The failed refresh never reached the transaction, so the previously
    // cached page is intact.
    assert_eq!(store.article_count().await.unwrap(), 10);
    assert_eq!(store.page_key_count().await.unwrap(), 10);
}
