//! `POST /api/send-confirmation` and `POST /api/resend-confirmation`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use plug_db::queries::entrants;
use plug_db::DbError;
use plug_mail::templates::{ConfirmationEmail, EmailKind};
use plug_mail::MailError;
use plug_referral::{link, ReferralCode};
use plug_types::api::{MailResponse, ResendRequest, SendConfirmationRequest};
use plug_types::UserType;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Client-facing text for a failed send: the provider's own reason when it
/// gave one.
fn failure_message(err: &MailError) -> String {
    match err {
        MailError::Rejected { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Render and send one confirmation email. Returns the provider message id.
async fn deliver(
    state: &AppState,
    kind: EmailKind,
    to: &str,
    first_name: &str,
    user_type: Option<UserType>,
    code: &ReferralCode,
) -> plug_mail::Result<String> {
    let app_url = &state.config.server.app_url;
    let referral_link = link::referral_link(app_url, code);
    let confirm_link = link::confirmation_link(app_url, code);
    let message = ConfirmationEmail {
        kind,
        first_name,
        user_type,
        referral_code: code.as_str(),
        referral_link: &referral_link,
        confirm_link: &confirm_link,
    }
    .to_message(&state.config.email.from_address, to);
    state.mailer.send(&message).await
}

/// Send the welcome email for details the caller already holds.
pub async fn send_confirmation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendConfirmationRequest>, JsonRejection>,
) -> ApiResult<Json<MailResponse>> {
    let Json(req) = payload?;
    let (Some(email), Some(first_name), Some(code)) = (
        present(req.email),
        present(req.first_name),
        present(req.referral_code),
    ) else {
        return Err(ApiError::Validation("Missing required fields".into()));
    };
    let code = ReferralCode::parse(&code)
        .map_err(|_| ApiError::Validation("invalid referral code".into()))?;
    let user_type = req.user_type.as_deref().and_then(|t| t.parse().ok());

    let id = deliver(&state, EmailKind::Welcome, &email, &first_name, user_type, &code)
        .await
        .map_err(|e| ApiError::internal(failure_message(&e), &e))?;
    info!(code = %code, message_id = %id, "confirmation email sent");

    Ok(Json(MailResponse {
        success: true,
        message_id: Some(id),
    }))
}

/// Send the confirmation link again to an unconfirmed entrant.
pub async fn resend_confirmation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResendRequest>, JsonRejection>,
) -> ApiResult<Json<MailResponse>> {
    let Json(req) = payload?;
    let email = present(req.email)
        .ok_or_else(|| ApiError::Validation("Email is required".into()))?;

    let entrant = {
        let db = state.db.lock().await;
        match entrants::get_by_email(&db, &email) {
            Ok(entrant) => entrant,
            Err(DbError::NotFound(_)) => {
                return Err(ApiError::NotFound("Email not found in waitlist".into()));
            }
            Err(e) => return Err(e.into()),
        }
    };
    if entrant.confirmed {
        return Err(ApiError::Validation("Email already confirmed".into()));
    }

    let code = ReferralCode::parse(&entrant.referral_code)
        .map_err(|e| ApiError::internal("Failed to send email", e))?;
    let id = deliver(
        &state,
        EmailKind::Reminder,
        &entrant.email,
        &entrant.first_name,
        Some(entrant.user_type),
        &code,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to send email", e))?;
    info!(code = %code, message_id = %id, "confirmation email resent");

    Ok(Json(MailResponse {
        success: true,
        message_id: Some(id),
    }))
}
