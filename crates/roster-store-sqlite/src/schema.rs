//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the
//! `user_version` pragma records the layout for the day one is needed.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per registered identity. `document` is the whole user record as
-- JSON and is rewritten in full by every update. `email` and `name` are
-- copied out of it for uniqueness and directory ordering; neither changes
-- after registration.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    document    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS users_name_idx ON users(name);

PRAGMA user_version = 1;
";
