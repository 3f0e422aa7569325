//! SQL schema definitions.

/// Complete schema for the v1 waitlist database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Entrants
-- ============================================================

CREATE TABLE IF NOT EXISTS waitlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    referral_code TEXT NOT NULL UNIQUE,
    referred_by TEXT,
    referral_count INTEGER NOT NULL DEFAULT 0 CHECK (referral_count >= 0),
    user_type TEXT NOT NULL,
    services TEXT NOT NULL DEFAULT '[]',
    provider_type TEXT,
    location TEXT NOT NULL,
    suggestion TEXT,
    confirmed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    confirmed_at INTEGER,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_waitlist_created ON waitlist(created_at, id);
CREATE INDEX IF NOT EXISTS idx_waitlist_referral_count ON waitlist(referral_count DESC, created_at);

-- ============================================================
-- Referral visits (append-only)
-- ============================================================

CREATE TABLE IF NOT EXISTS referral_visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    referral_code TEXT NOT NULL,
    visited_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_referral_visits_code ON referral_visits(referral_code);

CREATE TRIGGER IF NOT EXISTS referral_visits_no_update
BEFORE UPDATE ON referral_visits
BEGIN
    SELECT RAISE(ABORT, 'referral_visits is append-only');
END;

CREATE TRIGGER IF NOT EXISTS referral_visits_no_delete
BEFORE DELETE ON referral_visits
BEGIN
    SELECT RAISE(ABORT, 'referral_visits is append-only');
END;

-- ============================================================
-- Analytics events (append-only)
-- ============================================================

CREATE TABLE IF NOT EXISTS analytics_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type TEXT NOT NULL,
    user_email TEXT,
    ref_code TEXT,
    metadata TEXT NOT NULL DEFAULT '{}',
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_analytics_events_type ON analytics_events(event_type);

CREATE TRIGGER IF NOT EXISTS analytics_events_no_update
BEFORE UPDATE ON analytics_events
BEGIN
    SELECT RAISE(ABORT, 'analytics_events is append-only');
END;

CREATE TRIGGER IF NOT EXISTS analytics_events_no_delete
BEFORE DELETE ON analytics_events
BEGIN
    SELECT RAISE(ABORT, 'analytics_events is append-only');
END;
"#;
