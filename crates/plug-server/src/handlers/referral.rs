//! Referral visit tracking and reward progress.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use plug_db::queries::{entrants, referral_visits};
use plug_db::DbError;
use plug_referral::{rewards, ReferralCode};
use plug_types::api::{ReferralVisitRequest, SuccessResponse};
use plug_types::feed::ReferralProgress;
use tracing::debug;

use crate::clock;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `POST /api/referral-visits`: record a landing on `?ref=<code>`.
pub async fn track_visit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReferralVisitRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    let raw = req
        .referral_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("referral code is required".into()))?;
    let code = ReferralCode::parse(&raw)
        .map_err(|_| ApiError::Validation("invalid referral code".into()))?;

    {
        let db = state.db.lock().await;
        referral_visits::insert(&db, code.as_str(), clock::unix_now())?;
    }
    debug!(code = %code, "referral visit recorded");

    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/referrals/:code`
pub async fn progress(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<ReferralProgress>> {
    let not_found = || ApiError::NotFound("referral code not found".into());
    let code = ReferralCode::parse(&code).map_err(|_| not_found())?;

    let entrant = {
        let db = state.db.lock().await;
        match entrants::get_by_referral_code(&db, code.as_str()) {
            Ok(entrant) => entrant,
            Err(DbError::NotFound(_)) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }
    };

    Ok(Json(rewards::progress(
        &entrant.referral_code,
        entrant.referral_count,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use plug_db::queries::entrants::NewEntrant;
    use plug_types::UserType;

    fn visit(code: Option<&str>) -> Result<Json<ReferralVisitRequest>, JsonRejection> {
        Ok(Json(ReferralVisitRequest {
            referral_code: code.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_track_visit() {
        let (state, _) = test_support::state();
        for raw in ["ADA12345", " ADA12345 "] {
            let Json(resp) = track_visit(State(state.clone()), visit(Some(raw)))
                .await
                .expect("visit");
            assert!(resp.success);
        }

        let db = state.db.lock().await;
        assert_eq!(
            referral_visits::count_for_code(&db, "ADA12345").expect("count"),
            2
        );
    }

    #[tokio::test]
    async fn test_track_visit_rejects_empty() {
        let (state, _) = test_support::state();
        let err = track_visit(State(state.clone()), visit(Some("  ")))
            .await
            .expect_err("empty");
        assert_eq!(err.to_string(), "referral code is required");

        let err = track_visit(State(state), visit(Some("nope")))
            .await
            .expect_err("malformed");
        assert_eq!(err.to_string(), "invalid referral code");
    }

    #[tokio::test]
    async fn test_progress() {
        let (state, _) = test_support::state();
        {
            let db = state.db.lock().await;
            entrants::insert(
                &db,
                &NewEntrant {
                    email: "ada@x.com",
                    first_name: "Ada",
                    last_name: "Lovelace",
                    referral_code: "ADA12345",
                    referred_by: None,
                    user_type: UserType::User,
                    services: &["cleaning".to_string()],
                    provider_type: None,
                    location: "Lagos",
                    suggestion: None,
                    created_at: 1,
                },
            )
            .expect("insert");
            for _ in 0..4 {
                entrants::increment_referral_count(&db, "ADA12345", 2).expect("increment");
            }
        }

        let Json(report) = progress(State(state.clone()), Path("ADA12345".into()))
            .await
            .expect("progress");
        assert_eq!(report.referrals, 4);
        assert_eq!(report.progress_pct, 40);
        assert_eq!(report.unlocked.len(), 2);
        assert_eq!(report.next.map(|t| t.referrals), Some(5));

        for code in ["ZZZ99999", "bad"] {
            let err = progress(State(state.clone()), Path(code.into()))
                .await
                .expect_err("missing");
            assert!(matches!(err, ApiError::NotFound(_)));
        }
    }
}
