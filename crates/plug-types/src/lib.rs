//! # plug-types
//!
//! Shared domain types used across the PLUG waitlist workspace: entrant
//! classification, HTTP request/response payloads, and the read-only feed
//! shapes polled by the landing page.

pub mod api;
pub mod entrant;
pub mod feed;

pub use entrant::{ProviderKind, UserType};

/// Length of every referral / confirmation code.
pub const REFERRAL_CODE_LEN: usize = 8;

/// Number of entrants shown on the public leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// Number of entrants shown in the recent-activity feed.
pub const RECENT_SIGNUPS_SIZE: usize = 5;

/// Refresh interval for the aggregate counters, in seconds.
pub const STATS_REFRESH_SECS: u64 = 10;

/// Refresh interval for the leaderboard, in seconds.
pub const LEADERBOARD_REFRESH_SECS: u64 = 30;

/// Refresh interval for the recent-signups feed, in seconds.
pub const RECENT_SIGNUPS_REFRESH_SECS: u64 = 15;

/// Referral count at which the progress bar is full.
pub const REFERRAL_GOAL: u64 = 10;

/// Error returned when a classification string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}
