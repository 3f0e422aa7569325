//! Read-only landing page feeds. None of these write.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use plug_db::queries::entrants;
use plug_types::feed::{
    LeaderboardEntry, LeaderboardResponse, RecentSignup, RecentSignupsResponse, StatsResponse,
};
use plug_types::{
    LEADERBOARD_REFRESH_SECS, LEADERBOARD_SIZE, RECENT_SIGNUPS_REFRESH_SECS, RECENT_SIGNUPS_SIZE,
    STATS_REFRESH_SECS,
};

use crate::clock;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/stats`: total entrants and signups since 00:00 UTC.
pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatsResponse>> {
    let now = clock::unix_now();
    let db = state.db.lock().await;
    let total = entrants::count(&db)?;
    let today = entrants::count_created_between(&db, clock::day_start(now), now + 1)?;

    Ok(Json(StatsResponse {
        total,
        today,
        refresh_after_secs: STATS_REFRESH_SECS,
    }))
}

/// `GET /api/leaderboard`
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let rows = {
        let db = state.db.lock().await;
        entrants::top_referrers(&db, LEADERBOARD_SIZE)?
    };

    let entries = rows
        .into_iter()
        .map(|row| LeaderboardEntry {
            first_name: row.first_name,
            last_name: row.last_name,
            referrals: row.referral_count,
        })
        .collect();

    Ok(Json(LeaderboardResponse {
        entries,
        refresh_after_secs: LEADERBOARD_REFRESH_SECS,
    }))
}

/// `GET /api/recent-signups`
pub async fn recent_signups(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RecentSignupsResponse>> {
    let rows = {
        let db = state.db.lock().await;
        entrants::recent(&db, RECENT_SIGNUPS_SIZE)?
    };

    let now = clock::unix_now();
    let entries = rows
        .into_iter()
        .map(|row| RecentSignup {
            first_name: row.first_name,
            time_ago: clock::time_ago(now, row.created_at),
        })
        .collect();

    Ok(Json(RecentSignupsResponse {
        entries,
        refresh_after_secs: RECENT_SIGNUPS_REFRESH_SECS,
    }))
}
