//! SQL schema for the Precinct SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per actor currently punched in.
CREATE TABLE IF NOT EXISTS open_shifts (
    actor_id    INTEGER PRIMARY KEY,
    actor_label TEXT,
    started_at  TEXT NOT NULL    -- RFC 3339 with offset
);

-- History is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS shift_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id      INTEGER NOT NULL,
    actor_label   TEXT,
    started_at    TEXT NOT NULL,
    ended_at      TEXT NOT NULL,
    duration_text TEXT
);

-- One row per matched occurrence of the flagged phrase; a message that
-- matches three times yields three identical rows.
CREATE TABLE IF NOT EXISTS incidents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id    INTEGER NOT NULL,
    actor_label TEXT,
    raw_text    TEXT,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS incidents_actor_idx ON incidents(actor_id);
CREATE INDEX IF NOT EXISTS shift_history_actor_idx ON shift_history(actor_id);

PRAGMA user_version = 1;
";
