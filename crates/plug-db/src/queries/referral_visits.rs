//! Referral visit log. Append-only; the schema rejects updates and deletes.

use rusqlite::Connection;

use crate::Result;

/// Record a landing on `?ref=<code>`.
pub fn insert(conn: &Connection, referral_code: &str, visited_at: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO referral_visits (referral_code, visited_at) VALUES (?1, ?2)",
        rusqlite::params![referral_code, visited_at as i64],
    )?;
    Ok(())
}

/// Number of visits attributed to a referral code.
pub fn count_for_code(conn: &Connection, referral_code: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM referral_visits WHERE referral_code = ?1",
        [referral_code],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
