//! Analytics event log. Write-only from the handlers' perspective.

use rusqlite::Connection;

use crate::{DbError, Result};

/// Event type recorded for every successful signup.
pub const SIGNUP_EVENT: &str = "signup";

/// Append an analytics event.
pub fn insert(
    conn: &Connection,
    event_type: &str,
    user_email: Option<&str>,
    ref_code: Option<&str>,
    metadata: &serde_json::Value,
    created_at: u64,
) -> Result<()> {
    let metadata =
        serde_json::to_string(metadata).map_err(|e| DbError::Serialization(e.to_string()))?;
    conn.execute(
        "INSERT INTO analytics_events (event_type, user_email, ref_code, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![event_type, user_email, ref_code, metadata, created_at as i64],
    )?;
    Ok(())
}

/// Number of events of a given type.
pub fn count_by_type(conn: &Connection, event_type: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM analytics_events WHERE event_type = ?1",
        [event_type],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Events recorded for an email, oldest first.
pub fn list_for_email(conn: &Connection, user_email: &str) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT event_type, user_email, ref_code, metadata, created_at
         FROM analytics_events WHERE user_email = ?1 ORDER BY id",
    )?;

    let raw = stmt
        .query_map([user_email], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(event_type, user_email, ref_code, metadata, created_at)| {
            Ok(EventRow {
                event_type,
                user_email,
                ref_code,
                metadata: serde_json::from_str(&metadata)
                    .map_err(|e| DbError::Serialization(e.to_string()))?,
                created_at: created_at as u64,
            })
        })
        .collect()
}

/// A raw analytics event row.
#[derive(Debug, Clone)]
pub struct EventRow {
    pub event_type: String,
    pub user_email: Option<String>,
    pub ref_code: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_list() {
        let conn = crate::open_memory().expect("open");
        let metadata = serde_json::json!({"user_type": "user", "services": ["hair"]});
        insert(&conn, SIGNUP_EVENT, Some("a@x.com"), Some("ADA00001"), &metadata, 42)
            .expect("insert");

        let events = list_for_email(&conn, "a@x.com").expect("list");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, SIGNUP_EVENT);
        assert_eq!(events[0].ref_code.as_deref(), Some("ADA00001"));
        assert_eq!(events[0].metadata["services"][0], "hair");
        assert_eq!(count_by_type(&conn, SIGNUP_EVENT).expect("count"), 1);
    }

    #[test]
    fn test_events_cannot_be_deleted() {
        let conn = crate::open_memory().expect("open");
        insert(&conn, SIGNUP_EVENT, None, None, &serde_json::json!({}), 1).expect("insert");
        assert!(conn.execute("DELETE FROM analytics_events", []).is_err());
    }
}
