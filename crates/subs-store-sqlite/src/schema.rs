//! SQL schema for the subscriptions SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS subscriptions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    uid         TEXT    NOT NULL,   -- hyphenated lowercase uuid
    name        TEXT    NOT NULL CHECK (trim(name) <> ''),
    cost        INTEGER NOT NULL CHECK (cost >= 0),
    created_at  TEXT    NOT NULL    -- YYYY-MM-DD, always the 1st
                CHECK (strftime('%d', created_at) = '01'),
    expires     TEXT                -- RFC 3339 UTC or NULL
);

CREATE INDEX IF NOT EXISTS subscriptions_uid_idx ON subscriptions(uid);

PRAGMA user_version = 1;
";
