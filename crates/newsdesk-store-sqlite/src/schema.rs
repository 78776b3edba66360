//! SQL schema for the newsdesk SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS sources (
    source_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,
    homepage    TEXT UNIQUE,        -- NULL when the first article had no authority
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    topic_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- Sources cannot be deleted while articles reference them.
CREATE TABLE IF NOT EXISTS articles (
    article_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    url          TEXT NOT NULL UNIQUE,
    source_id    INTEGER NOT NULL REFERENCES sources(source_id) ON DELETE RESTRICT,
    published_at TEXT,              -- fixed-width RFC 3339 UTC; NULL if unknown
    author       TEXT NOT NULL DEFAULT '',
    body         TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS article_topics (
    article_id  INTEGER NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
    topic_id    INTEGER NOT NULL REFERENCES topics(topic_id)     ON DELETE CASCADE,
    PRIMARY KEY (article_id, topic_id)
);

-- At most one summary per article.
CREATE TABLE IF NOT EXISTS summaries (
    article_id  INTEGER PRIMARY KEY REFERENCES articles(article_id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    model_name  TEXT NOT NULL DEFAULT 'baseline',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS articles_published_idx ON articles(published_at);
CREATE INDEX IF NOT EXISTS articles_source_idx    ON articles(source_id);
CREATE INDEX IF NOT EXISTS article_topics_topic_idx ON article_topics(topic_id);

PRAGMA user_version = 1;
";
