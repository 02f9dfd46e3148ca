use spacefeed::paging::LoadState;
use spacefeed::{FeedConfig, FeedRepository, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let force_refresh = args.iter().any(|a| a == "--refresh");
    let pages: usize = args
        .iter()
        .position(|a| a == "--pages")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let config = FeedConfig::load()?;
    let repository = FeedRepository::open(config).await?;

    let mut feed = repository.observe_articles();
    feed.init().await;

    if force_refresh {
        feed.refresh().await;
    }

    if let LoadState::Error(e) = feed.refresh_state() {
        eprintln!("refresh failed: {e}");
    }

    // Walk the window to pull the requested number of pages via the
    // look-ahead trigger.
    for _ in 1..pages {
        let end = feed.articles().len().saturating_sub(1);
        feed.notify_visible(end).await;
        if let LoadState::Error(e) = feed.append_state() {
            eprintln!("append failed: {e}");
            break;
        }
        if matches!(feed.append_state(), LoadState::EndOfData) {
            break;
        }
    }

    for article in feed.articles() {
        println!(
            "{}  {}",
            article.published_at.format("%Y-%m-%d %H:%M"),
            article.title
        );
    }

    Ok(())
}
