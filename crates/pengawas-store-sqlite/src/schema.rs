//! SQL schema for the Pengawas SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS supervisors (
    supervisor_id       TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    registration_number TEXT NOT NULL,   -- NIP
    title               TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schools (
    school_id           TEXT PRIMARY KEY,
    registration_number TEXT NOT NULL,   -- NPSN
    name                TEXT NOT NULL,
    region              TEXT NOT NULL
);

-- school_ids and form_data are JSON text. Older rows may hold school_ids in
-- other shapes; readers parse them leniently.
CREATE TABLE IF NOT EXISTS plans (
    plan_id      TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL,
    school_ids   TEXT NOT NULL DEFAULT '[]',
    period_label TEXT NOT NULL,            -- canonical 'YYYY' or 'YYYY-Tn'
    status       TEXT NOT NULL DEFAULT 'draft',  -- 'draft' | 'published'
    form_data    TEXT NOT NULL DEFAULT '{}',
    created_at   TEXT NOT NULL,            -- RFC 3339 UTC, fixed width
    updated_at   TEXT NOT NULL,
    published_at TEXT
);

-- Mentoring visits.
CREATE TABLE IF NOT EXISTS activities (
    activity_id TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    school_id   TEXT NOT NULL,
    date        TEXT NOT NULL,             -- YYYY-MM-DD
    note        TEXT,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS plans_owner_idx      ON plans(owner_id, status, period_label);
CREATE INDEX IF NOT EXISTS activities_owner_idx ON activities(owner_id, date);

PRAGMA user_version = 1;
";
