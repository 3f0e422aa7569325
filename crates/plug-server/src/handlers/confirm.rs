//! `POST /api/confirm-email`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use plug_db::queries::entrants;
use plug_db::DbError;
use plug_referral::ReferralCode;
use plug_types::api::{ConfirmRequest, ConfirmResponse};
use tracing::{info, warn};

use super::caller_address;
use crate::clock;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Pull a well-formed code out of the body without touching storage.
fn requested_code(payload: Result<Json<ConfirmRequest>, JsonRejection>) -> ApiResult<ReferralCode> {
    let Ok(Json(req)) = payload else {
        return Err(ApiError::InvalidCode);
    };
    let code = req
        .code
        .as_ref()
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::InvalidCode)?;
    ReferralCode::parse(code).map_err(|_| ApiError::InvalidCodeFormat)
}

pub async fn confirm_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> ApiResult<Json<ConfirmResponse>> {
    let caller = caller_address(&headers);
    if !state.confirm_limiter.check(&caller).await {
        warn!(%caller, "confirmation rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    let code = requested_code(payload)?;
    let now = clock::unix_now();

    let db = state.db.lock().await;
    let entrant = match entrants::get_by_referral_code(&db, code.as_str()) {
        Ok(entrant) => entrant,
        Err(DbError::NotFound(_)) => return Err(ApiError::ExpiredCode),
        Err(e) => return Err(e.into()),
    };

    // A concurrent confirmation elsewhere makes the guarded update a no-op.
    let already_confirmed = entrant.confirmed
        || !entrants::mark_confirmed(&db, code.as_str(), now)
            .map_err(|e| ApiError::internal("failed to confirm email", e))?;

    let position = entrants::position(&db, entrant.created_at, entrant.id)?;
    drop(db);

    if already_confirmed {
        info!(code = %code, "email already confirmed");
    } else {
        info!(code = %code, position, "email confirmed");
    }

    Ok(Json(ConfirmResponse {
        success: true,
        position,
        already_confirmed,
    }))
}
