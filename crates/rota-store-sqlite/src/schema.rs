//! SQL schema for the Rota SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS clubs (
    club_id  TEXT PRIMARY KEY,
    title    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS places (
    place_id TEXT PRIMARY KEY,
    title    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS job_types (
    job_type_id TEXT PRIMARY KEY,
    title       TEXT NOT NULL UNIQUE,
    is_archived INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS persons (
    person_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    club_id    TEXT NOT NULL REFERENCES clubs(club_id),
    status     TEXT NOT NULL,   -- 'aktiv' | 'kandidat' | 'ehemalig'
    ldap_id    TEXT,
    updated_at TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS events (
    event_id        TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    subtitle        TEXT NOT NULL,
    public_info     TEXT NOT NULL,
    private_details TEXT NOT NULL,
    kind            INTEGER NOT NULL,  -- EventKind code
    place_id        TEXT NOT NULL REFERENCES places(place_id),
    begin_date      TEXT NOT NULL,     -- YYYY-MM-DD
    end_date        TEXT NOT NULL,
    begin_time      TEXT NOT NULL,     -- HH:MM:SS
    end_time        TEXT NOT NULL,
    is_private      INTEGER NOT NULL
);

-- Exactly one schedule per event. The revision log is one JSON array; it is
-- only ever appended to, never rewritten.
CREATE TABLE IF NOT EXISTS schedules (
    schedule_id TEXT PRIMARY KEY,
    event_id    TEXT NOT NULL REFERENCES events(event_id),
    due_date    TEXT,              -- YYYY-MM-DD or NULL
    title       TEXT,
    is_template INTEGER NOT NULL DEFAULT 0,
    revisions   TEXT NOT NULL DEFAULT '[]',
    UNIQUE (event_id)
);

CREATE TABLE IF NOT EXISTS schedule_entries (
    entry_id    TEXT PRIMARY KEY,
    schedule_id TEXT NOT NULL REFERENCES schedules(schedule_id),
    job_type_id TEXT NOT NULL REFERENCES job_types(job_type_id),
    person_id   TEXT REFERENCES persons(person_id),
    position    INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS entries_schedule_idx ON schedule_entries(schedule_id);
CREATE INDEX IF NOT EXISTS schedules_event_idx  ON schedules(event_id);
CREATE INDEX IF NOT EXISTS persons_club_idx     ON persons(club_id);

PRAGMA user_version = 1;
";
