//! Waitlist entrant query functions.

use plug_types::{ProviderKind, UserType};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::{classify, DbError, Result};

const ENTRANT_COLUMNS: &str = "id, email, first_name, last_name, referral_code, referred_by,
     referral_count, user_type, services, provider_type, location, suggestion,
     confirmed, created_at, confirmed_at, updated_at";

/// Fields required to create an entrant.
#[derive(Debug, Clone)]
pub struct NewEntrant<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub referral_code: &'a str,
    pub referred_by: Option<&'a str>,
    pub user_type: UserType,
    pub services: &'a [String],
    pub provider_type: Option<ProviderKind>,
    pub location: &'a str,
    pub suggestion: Option<&'a str>,
    pub created_at: u64,
}

/// Insert a new, unconfirmed entrant. Returns the generated id.
///
/// The email is lowercased before storage. A duplicate email or referral
/// code yields [`DbError::Constraint`].
pub fn insert(conn: &Connection, entrant: &NewEntrant<'_>) -> Result<i64> {
    let services = serde_json::to_string(entrant.services)
        .map_err(|e| DbError::Serialization(e.to_string()))?;

    conn.execute(
        "INSERT INTO waitlist (email, first_name, last_name, referral_code, referred_by,
             referral_count, user_type, services, provider_type, location, suggestion,
             confirmed, created_at, confirmed_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9, ?10, 0, ?11, NULL, ?11)",
        rusqlite::params![
            entrant.email.to_lowercase(),
            entrant.first_name,
            entrant.last_name,
            entrant.referral_code,
            entrant.referred_by,
            entrant.user_type.as_str(),
            services,
            entrant.provider_type.map(|p| p.as_str()),
            entrant.location,
            entrant.suggestion,
            entrant.created_at as i64,
        ],
    )
    .map_err(|e| classify(e, "entrant"))?;

    Ok(conn.last_insert_rowid())
}

/// Get an entrant by email (case-insensitive).
pub fn get_by_email(conn: &Connection, email: &str) -> Result<EntrantRow> {
    conn.query_row(
        &format!("SELECT {ENTRANT_COLUMNS} FROM waitlist WHERE email = ?1"),
        [email.trim().to_lowercase()],
        entrant_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound("entrant".into()),
        other => DbError::Sqlite(other),
    })
}

/// Get an entrant by referral code.
pub fn get_by_referral_code(conn: &Connection, code: &str) -> Result<EntrantRow> {
    conn.query_row(
        &format!("SELECT {ENTRANT_COLUMNS} FROM waitlist WHERE referral_code = ?1"),
        [code],
        entrant_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound("entrant".into()),
        other => DbError::Sqlite(other),
    })
}

/// Whether an email is already on the waitlist.
pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM waitlist WHERE email = ?1",
            [email.trim().to_lowercase()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Whether a referral code is already taken.
pub fn referral_code_exists(conn: &Connection, code: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM waitlist WHERE referral_code = ?1",
            [code],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Atomically bump the referral count of the entrant owning `code`.
///
/// Single-statement increment; never read-modify-write. Returns `false`
/// when no entrant owns the code.
pub fn increment_referral_count(conn: &Connection, code: &str, now: u64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE waitlist SET referral_count = referral_count + 1, updated_at = ?2
         WHERE referral_code = ?1",
        rusqlite::params![code, now as i64],
    )?;
    Ok(changed > 0)
}

/// Flip `confirmed` to true for the entrant owning `code`.
///
/// Only an unconfirmed row is touched, so `confirmed_at` is written exactly
/// once. Returns `true` if this call performed the transition.
pub fn mark_confirmed(conn: &Connection, code: &str, now: u64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE waitlist SET confirmed = 1, confirmed_at = ?2, updated_at = ?2
         WHERE referral_code = ?1 AND confirmed = 0",
        rusqlite::params![code, now as i64],
    )?;
    Ok(changed > 0)
}

/// 1-based queue position: entrants created at or before this one.
///
/// Ties on `created_at` are broken by id, so the result is always
/// 1 + the number of entrants that signed up strictly earlier.
pub fn position(conn: &Connection, created_at: u64, id: i64) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM waitlist
         WHERE created_at < ?1 OR (created_at = ?1 AND id <= ?2)",
        rusqlite::params![created_at as i64, id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Total number of entrants.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM waitlist", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Entrants created in `[from, until)`.
pub fn count_created_between(conn: &Connection, from: u64, until: u64) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM waitlist WHERE created_at >= ?1 AND created_at < ?2",
        rusqlite::params![from as i64, until as i64],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Entrants with the most referrals, earliest signup first on ties.
pub fn top_referrers(conn: &Connection, limit: usize) -> Result<Vec<LeaderboardRow>> {
    let mut stmt = conn.prepare(
        "SELECT first_name, last_name, referral_count FROM waitlist
         ORDER BY referral_count DESC, created_at ASC, id ASC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(LeaderboardRow {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                referral_count: row.get::<_, i64>(2)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Most recent signups, newest first.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<RecentRow>> {
    let mut stmt = conn.prepare(
        "SELECT first_name, created_at FROM waitlist
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(RecentRow {
                first_name: row.get(0)?,
                created_at: row.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn entrant_from_row(row: &Row<'_>) -> rusqlite::Result<EntrantRow> {
    let services_json: String = row.get(8)?;
    let services: Vec<String> = serde_json::from_str(&services_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    let user_type = row
        .get::<_, String>(7)?
        .parse::<UserType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    let provider_type = row
        .get::<_, Option<String>>(9)?
        .map(|p| p.parse::<ProviderKind>())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(EntrantRow {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        referral_code: row.get(4)?,
        referred_by: row.get(5)?,
        referral_count: row.get::<_, i64>(6)? as u64,
        user_type,
        services,
        provider_type,
        location: row.get(10)?,
        suggestion: row.get(11)?,
        confirmed: row.get(12)?,
        created_at: row.get::<_, i64>(13)? as u64,
        confirmed_at: row.get::<_, Option<i64>>(14)?.map(|t| t as u64),
        updated_at: row.get::<_, i64>(15)? as u64,
    })
}

/// A full entrant row.
#[derive(Debug, Clone)]
pub struct EntrantRow {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub referral_count: u64,
    pub user_type: UserType,
    pub services: Vec<String>,
    pub provider_type: Option<ProviderKind>,
    pub location: String,
    pub suggestion: Option<String>,
    pub confirmed: bool,
    pub created_at: u64,
    pub confirmed_at: Option<u64>,
    pub updated_at: u64,
}

/// Leaderboard projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub first_name: String,
    pub last_name: String,
    pub referral_count: u64,
}

/// Recent-activity projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRow {
    pub first_name: String,
    pub created_at: u64,
}
