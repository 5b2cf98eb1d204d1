//! Canonical SQLite schema for the passgate store.
//!
//! One row per request with the latest state only — no event log, no audit
//! trail beyond the `edited_fields` marker:
//! - `requests` holds the template fields, status, assignment, and the
//!   `version` column the compare-and-set update pivots on
//! - `actors` is the directory: role and block state per opaque id

/// Migration v1: request rows and the actor directory.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    division TEXT,
    direction TEXT,
    checkpoint TEXT,
    date_start TEXT,
    date_end TEXT,
    time_start TEXT,
    time_end TEXT,
    car_brand TEXT,
    people_count INTEGER CHECK (people_count IS NULL OR people_count >= 0),
    leader_name TEXT,
    cargo TEXT,
    purpose TEXT NOT NULL CHECK (length(trim(purpose)) > 0),
    status TEXT NOT NULL DEFAULT 'new' CHECK (status IN (
        'new', 'on_clarification', 'cancelled', 'completed',
        'edited', 'duplicated', 'in_progress'
    )),
    edited_fields TEXT NOT NULL DEFAULT '',
    reason TEXT,
    operator_id INTEGER,
    version INTEGER NOT NULL DEFAULT 1 CHECK (version >= 1),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS actors (
    actor_id INTEGER PRIMARY KEY,
    username TEXT,
    full_name TEXT,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'operator', 'admin')),
    blocked INTEGER NOT NULL DEFAULT 0 CHECK (blocked IN (0, 1))
);
";

/// Migration v2: read-path indexes.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_requests_status
    ON requests(status, id);

CREATE INDEX IF NOT EXISTS idx_requests_user
    ON requests(user_id, id);

CREATE INDEX IF NOT EXISTS idx_requests_operator
    ON requests(operator_id, id);

CREATE INDEX IF NOT EXISTS idx_requests_date_start
    ON requests(date_start);

CREATE INDEX IF NOT EXISTS idx_actors_role
    ON actors(role, actor_id);
";

/// Indexes that must exist after migration, for wiring tests.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_requests_status",
    "idx_requests_user",
    "idx_requests_operator",
    "idx_requests_date_start",
    "idx_actors_role",
];
