//! Wall-clock helpers. All timestamps are Unix epoch seconds, days are UTC.

/// Day length in seconds.
pub const DAY_SECS: u64 = 24 * 60 * 60;

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 00:00 UTC of the day containing `ts`.
pub fn day_start(ts: u64) -> u64 {
    ts - (ts % DAY_SECS)
}

/// Relative age of `then` as seen at `now`, coarsest unit first.
pub fn time_ago(now: u64, then: u64) -> String {
    let seconds = now.saturating_sub(then);
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 60 * 60 {
        format!("{}m ago", seconds / 60)
    } else if seconds < DAY_SECS {
        format!("{}h ago", seconds / (60 * 60))
    } else {
        format!("{}d ago", seconds / DAY_SECS)
    }
}
