//! Read-only feed payloads polled by the landing page.

use serde::{Deserialize, Serialize};

/// `GET /api/stats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: u64,
    /// Signups since 00:00 UTC.
    pub today: u64,
    pub refresh_after_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub first_name: String,
    pub last_name: String,
    pub referrals: u64,
}

/// `GET /api/leaderboard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub refresh_after_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSignup {
    pub first_name: String,
    /// "just now", "5m ago", "2h ago", "3d ago".
    pub time_ago: String,
}

/// `GET /api/recent-signups`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSignupsResponse {
    pub entries: Vec<RecentSignup>,
    pub refresh_after_secs: u64,
}

/// One rung of the referral rewards ladder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub referrals: u64,
    pub title: String,
    pub description: String,
}

/// `GET /api/referrals/{code}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralProgress {
    pub referral_code: String,
    pub referrals: u64,
    /// 0..=100, full at [`crate::REFERRAL_GOAL`].
    pub progress_pct: u8,
    pub unlocked: Vec<RewardTier>,
    pub next: Option<RewardTier>,
}
