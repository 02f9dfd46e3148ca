use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{Article, PageKey};

use super::schema::SCHEMA;

/// The local article cache. All mutation goes through [`Store::run_transaction`]
/// or the single-statement convenience wrappers; readers see either the state
/// before a transaction or after it, never a partial write.
#[derive(Clone)]
pub struct Store {
    conn: tokio_rusqlite::Connection,
}

impl Store {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open_in_memory().await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Run `work` inside one SQLite transaction. The transaction commits only
    /// if `work` returns `Ok`; any error rolls every statement back.
    pub async fn run_transaction<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> rusqlite::Result<()> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                work(&tx)?;
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn upsert_articles(&self, articles: Vec<Article>) -> Result<()> {
        self.conn
            .call(move |conn| {
                insert_articles(conn, &articles)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn upsert_page_keys(&self, keys: Vec<PageKey>) -> Result<()> {
        self.conn
            .call(move |conn| {
                insert_page_keys(conn, &keys)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                clear_page_keys(conn)?;
                clear_articles(conn)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// The range query powering the observed feed: every cached article,
    /// newest first.
    pub async fn articles_newest_first(&self) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, summary, url, image_url, published_at
                     FROM articles ORDER BY published_at DESC",
                )?;
                let articles = stmt
                    .query_map([], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    pub async fn page_key(&self, article_id: i64) -> Result<Option<PageKey>> {
        let key = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT article_id, previous_page, current_page, next_page, written_at
                     FROM page_keys WHERE article_id = ?1",
                )?;
                let key = stmt
                    .query_row(params![article_id], page_key_from_row)
                    .optional()?;
                Ok(key)
            })
            .await?;
        Ok(key)
    }

    /// Freshness epoch of the whole cache: the most recent page key write,
    /// or `None` when nothing has ever been cached.
    pub async fn latest_write_epoch(&self) -> Result<Option<DateTime<Utc>>> {
        let epoch = self
            .conn
            .call(|conn| {
                let written: Option<String> = conn
                    .query_row(
                        "SELECT written_at FROM page_keys ORDER BY written_at DESC LIMIT 1",
                        [],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(written)
            })
            .await?;
        Ok(epoch.as_deref().and_then(parse_datetime))
    }

    pub async fn article_count(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    pub async fn page_key_count(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM page_keys", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    /// Articles with no matching page key (and vice versa). Zero whenever the
    /// write path has done its job; exposed so tests can check the invariant.
    pub async fn orphan_count(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT
                        (SELECT COUNT(*) FROM articles a
                         WHERE NOT EXISTS (SELECT 1 FROM page_keys k WHERE k.article_id = a.id))
                      + (SELECT COUNT(*) FROM page_keys k
                         WHERE NOT EXISTS (SELECT 1 FROM articles a WHERE a.id = k.article_id))",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

// Transaction-scoped write helpers. These take a plain `&Connection` so they
// compose both inside a `run_transaction` closure (via deref on the
// transaction) and in the single-statement wrappers above. The merge phase of
// a load cycle is built entirely from these.

pub fn insert_articles(conn: &Connection, articles: &[Article]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO articles (id, title, summary, url, image_url, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for article in articles {
        stmt.execute(params![
            article.id,
            article.title,
            article.summary,
            article.url,
            article.image_url,
            article.published_at.to_rfc3339(),
        ])?;
    }
    Ok(())
}

pub fn insert_page_keys(conn: &Connection, keys: &[PageKey]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO page_keys
            (article_id, previous_page, current_page, next_page, written_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for key in keys {
        stmt.execute(params![
            key.article_id,
            key.previous_page,
            key.current_page,
            key.next_page,
            key.written_at.to_rfc3339(),
        ])?;
    }
    Ok(())
}

pub fn clear_articles(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM articles", [])?;
    Ok(())
}

pub fn clear_page_keys(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM page_keys", [])?;
    Ok(())
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        url: row.get(3)?,
        image_url: row.get(4)?,
        published_at: row
            .get::<_, String>(5)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}

fn page_key_from_row(row: &Row) -> rusqlite::Result<PageKey> {
    Ok(PageKey {
        article_id: row.get(0)?,
        previous_page: row.get(1)?,
        current_page: row.get(2)?,
        next_page: row.get(3)?,
        written_at: row
            .get::<_, String>(4)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}
