//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contents (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    body         TEXT NOT NULL,
    content_type TEXT NOT NULL
                 CHECK (content_type IN ('article', 'blog', 'news', 'page')),
    author       TEXT NOT NULL,
    created_at   TEXT NOT NULL,   -- RFC 3339 UTC, microseconds; set once
    updated_at   TEXT NOT NULL,   -- refreshed on every write
    deleted_at   TEXT             -- non-NULL once soft-deleted
);

CREATE INDEX IF NOT EXISTS contents_deleted_idx ON contents(deleted_at);
CREATE INDEX IF NOT EXISTS contents_type_idx    ON contents(content_type);
CREATE INDEX IF NOT EXISTS contents_author_idx  ON contents(author);
CREATE INDEX IF NOT EXISTS contents_created_idx ON contents(created_at);

CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,     -- lower-cased by the domain layer
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

-- Emails are unique among active users only, so a soft-deleted user's
-- address can be registered again.
CREATE UNIQUE INDEX IF NOT EXISTS users_email_active_idx
    ON users(email) WHERE deleted_at IS NULL;
CREATE INDEX IF NOT EXISTS users_deleted_idx ON users(deleted_at);

PRAGMA user_version = 1;
";
