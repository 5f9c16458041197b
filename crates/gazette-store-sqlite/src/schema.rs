//! SQL schema for the Gazette SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS editions (
    edition_id     TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    publish_date   TEXT NOT NULL,            -- YYYY-MM-DD
    edition_number INTEGER,
    is_published   INTEGER NOT NULL DEFAULT 0 CHECK (is_published IN (0, 1)),
    cover_images   TEXT NOT NULL DEFAULT '[]', -- JSON array of URLs
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    article_id     TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    slug           TEXT NOT NULL UNIQUE,
    excerpt        TEXT NOT NULL DEFAULT '',
    body           TEXT NOT NULL DEFAULT '',
    content_format TEXT NOT NULL CHECK (content_format IN ('html', 'markdown')),
    status         TEXT NOT NULL CHECK (status IN (
                     'draft', 'under_review', 'approved',
                     'published', 'rejected', 'archived')),
    author_id      TEXT NOT NULL,
    edition_id     TEXT REFERENCES editions(edition_id),
    featured       INTEGER NOT NULL DEFAULT 0,
    published_at   TEXT,                     -- set once, on first publish
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Review notes are strictly append-only; `seq` is the commit order.
CREATE TABLE IF NOT EXISTS review_notes (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id   TEXT NOT NULL UNIQUE,
    article_id  TEXT NOT NULL REFERENCES articles(article_id),
    reviewer_id TEXT NOT NULL,
    decision    TEXT NOT NULL CHECK (decision IN ('approved', 'rejected')),
    note        TEXT NOT NULL DEFAULT '',
    highlights  TEXT NOT NULL DEFAULT '[]',  -- JSON array of highlights
    created_at  TEXT NOT NULL
);

CREATE TRIGGER IF NOT EXISTS review_notes_no_update
BEFORE UPDATE ON review_notes
BEGIN
    SELECT RAISE(ABORT, 'review notes are append-only');
END;

CREATE TRIGGER IF NOT EXISTS review_notes_no_delete
BEFORE DELETE ON review_notes
BEGIN
    SELECT RAISE(ABORT, 'review notes are append-only');
END;

CREATE INDEX IF NOT EXISTS articles_status_idx       ON articles(status);
CREATE INDEX IF NOT EXISTS articles_edition_idx      ON articles(edition_id);
CREATE INDEX IF NOT EXISTS articles_author_idx       ON articles(author_id);
CREATE INDEX IF NOT EXISTS editions_publish_date_idx ON editions(publish_date);
CREATE INDEX IF NOT EXISTS review_notes_article_idx  ON review_notes(article_id, seq);

PRAGMA user_version = 1;
";
