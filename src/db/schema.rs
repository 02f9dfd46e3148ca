pub const SCHEMA: &str = r#"
-- The bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1, which
-- flips SQLite's documented default. The REFERENCES clause below is
-- documentation only: the write path (not the database) keeps articles and
-- page_keys consistent, so restore the standard default of no enforcement.
PRAGMA foreign_keys = OFF;

-- articles table
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    summary TEXT NOT NULL,
    url TEXT NOT NULL,
    image_url TEXT,
    published_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at DESC);

-- page_keys table (1:1 with articles, drives limit/offset for the next fetch)
CREATE TABLE IF NOT EXISTS page_keys (
    article_id INTEGER PRIMARY KEY REFERENCES articles(id),
    previous_page INTEGER,
    current_page INTEGER NOT NULL,
    next_page INTEGER,
    written_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_keys_written_at ON page_keys(written_at DESC);
"#;
