//! `POST /api/waitlist`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use plug_db::queries::{analytics, entrants};
use plug_db::DbError;
use plug_mail::templates::{ConfirmationEmail, EmailKind};
use plug_referral::code::MAX_GENERATION_ATTEMPTS;
use plug_referral::{link, ReferralCode};
use plug_types::api::{SignupRequest, SignupResponse};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::clock;
use crate::error::{ApiError, ApiResult};
use crate::validation::{validate_signup, ValidSignup};
use crate::AppState;

/// Generate a code no entrant holds yet.
fn unused_code(conn: &Connection, first_name: &str) -> ApiResult<ReferralCode> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = ReferralCode::generate(first_name);
        if !entrants::referral_code_exists(conn, code.as_str())? {
            return Ok(code);
        }
        warn!(code = %code, "referral code collision, regenerating");
    }
    Err(ApiError::internal(
        "failed to generate referral code",
        format!("{MAX_GENERATION_ATTEMPTS} collisions in a row"),
    ))
}

fn signup_metadata(signup: &ValidSignup) -> serde_json::Value {
    serde_json::json!({
        "user_type": signup.user_type.as_str(),
        "services": signup.services,
        "provider_type": signup.provider_type.map(|k| k.as_str()),
        "location": signup.location,
        "suggestion": signup.suggestion,
    })
}

/// Credit the referrer. Failures never fail the signup.
fn credit_referrer(conn: &Connection, referred_by: &str, now: u64) {
    let Ok(code) = ReferralCode::parse(referred_by) else {
        warn!(referred_by, "ignoring malformed referral code");
        return;
    };
    match entrants::increment_referral_count(conn, code.as_str(), now) {
        Ok(true) => info!(code = %code, "referral credited"),
        Ok(false) => warn!(code = %code, "referral code not found, nothing credited"),
        Err(e) => warn!(code = %code, "failed to credit referral: {e}"),
    }
}

/// Insert the entrant and its side effects. Runs under the database lock so
/// the duplicate check, code choice and insert cannot interleave with
/// another signup.
fn register(conn: &Connection, signup: &ValidSignup, now: u64) -> ApiResult<(i64, ReferralCode)> {
    if entrants::email_exists(conn, &signup.email)? {
        return Err(ApiError::Duplicate);
    }

    let code = unused_code(conn, &signup.first_name)?;
    let new = entrants::NewEntrant {
        email: &signup.email,
        first_name: &signup.first_name,
        last_name: &signup.last_name,
        referral_code: code.as_str(),
        referred_by: signup.referred_by.as_deref(),
        user_type: signup.user_type,
        services: &signup.services,
        provider_type: signup.provider_type,
        location: &signup.location,
        suggestion: signup.suggestion.as_deref(),
        created_at: now,
    };
    let id = match entrants::insert(conn, &new) {
        Ok(id) => id,
        // Another process sharing the file may have inserted the same email.
        Err(e @ DbError::Constraint(_)) => {
            if entrants::email_exists(conn, &signup.email)? {
                return Err(ApiError::Duplicate);
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = analytics::insert(
        conn,
        analytics::SIGNUP_EVENT,
        Some(&signup.email),
        signup.referred_by.as_deref(),
        &signup_metadata(signup),
        now,
    ) {
        warn!("failed to record signup event: {e}");
    }

    if let Some(referred_by) = &signup.referred_by {
        credit_referrer(conn, referred_by, now);
    }

    Ok((id, code))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Json<SignupResponse>> {
    let Json(req) = payload?;
    let signup = validate_signup(&req)?;

    // Timestamp taken under the lock keeps created_at in insertion order.
    let (id, code, now) = {
        let db = state.db.lock().await;
        let now = clock::unix_now();
        let (id, code) = register(&db, &signup, now)?;
        (id, code, now)
    };
    info!(id, code = %code, user_type = %signup.user_type, "new waitlist signup");

    let app_url = &state.config.server.app_url;
    let referral_link = link::referral_link(app_url, &code);
    let confirm_link = link::confirmation_link(app_url, &code);
    let message = ConfirmationEmail {
        kind: EmailKind::Welcome,
        first_name: &signup.first_name,
        user_type: Some(signup.user_type),
        referral_code: code.as_str(),
        referral_link: &referral_link,
        confirm_link: &confirm_link,
    }
    .to_message(&state.config.email.from_address, &signup.email);
    if let Err(e) = state.mailer.send(&message).await {
        warn!(code = %code, "welcome email failed: {e}");
    }

    let position = {
        let db = state.db.lock().await;
        entrants::position(&db, now, id)?
    };

    Ok(Json(SignupResponse {
        success: true,
        position,
        referral_code: code.into_string(),
        referral_link,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn request(email: &str, first_name: &str, referred_by: Option<&str>) -> SignupRequest {
        SignupRequest {
            email: email.into(),
            first_name: first_name.into(),
            last_name: "Test".into(),
            user_type: "user".into(),
            services: vec!["cleaning".into()],
            provider_type: None,
            location: "Lagos".into(),
            suggestion: None,
            referred_by: referred_by.map(str::to_string),
        }
    }

    async fn call(state: &Arc<AppState>, req: SignupRequest) -> ApiResult<SignupResponse> {
        signup(State(state.clone()), Ok(Json(req)))
            .await
            .map(|Json(r)| r)
    }

    #[tokio::test]
    async fn test_signup_and_referral() {
        let (state, mailer) = test_support::state();

        let ada = call(&state, request("ada@x.com", "Ada", None)).await.expect("ada");
        assert_eq!(ada.position, 1);
        assert!(ada.referral_code.starts_with("ADA"));
        assert_eq!(ada.referral_code.len(), 8);
        assert_eq!(
            ada.referral_link,
            format!("https://plugservices.ng?ref={}", ada.referral_code)
        );

        let bo = call(&state, request("bo@x.com", "Bo", Some(&ada.referral_code)))
            .await
            .expect("bo");
        assert_eq!(bo.position, 2);

        let db = state.db.lock().await;
        let ada_row = entrants::get_by_email(&db, "ada@x.com").expect("row");
        assert_eq!(ada_row.referral_count, 1);
        assert!(!ada_row.confirmed);
        let bo_row = entrants::get_by_email(&db, "bo@x.com").expect("row");
        assert_eq!(bo_row.referred_by.as_deref(), Some(ada.referral_code.as_str()));
        assert_eq!(analytics::count_by_type(&db, analytics::SIGNUP_EVENT).expect("count"), 2);
        let events = analytics::list_for_email(&db, "bo@x.com").expect("events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ref_code.as_deref(), Some(ada.referral_code.as_str()));
        assert_eq!(events[0].metadata["user_type"], "user");
        assert_eq!(events[0].metadata["services"][0], "cleaning");
        drop(db);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0]
            .html
            .contains(&format!("https://plugservices.ng/confirm?code={}", ada.referral_code)));
    }

    #[tokio::test]
    async fn test_duplicate_email_case_insensitive() {
        let (state, _) = test_support::state();
        call(&state, request("ada@x.com", "Ada", None)).await.expect("first");

        let err = call(&state, request("ADA@X.com", "Ada", None))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, ApiError::Duplicate));

        let db = state.db.lock().await;
        assert_eq!(entrants::count(&db).expect("count"), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let (state, mailer) = test_support::state();
        let err = call(&state, request("x@tempmail.com", "Ada", None))
            .await
            .expect_err("disposable");
        assert_eq!(err.to_string(), "disposable email addresses are not allowed");

        let db = state.db.lock().await;
        assert_eq!(entrants::count(&db).expect("count"), 0);
        assert!(mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_referrer_is_ignored() {
        let (state, _) = test_support::state();
        let resp = call(&state, request("ada@x.com", "Ada", Some("ZZZ99999")))
            .await
            .expect("signup still succeeds");
        assert_eq!(resp.position, 1);

        let resp = call(&state, request("bo@x.com", "Bo", Some("not a code")))
            .await
            .expect("malformed referrer ignored");
        assert_eq!(resp.position, 2);
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_signup() {
        let state = test_support::state_with_mailer(Arc::new(test_support::FailingMailer));
        let resp = call(&state, request("ada@x.com", "Ada", None))
            .await
            .expect("signup");
        assert!(resp.success);
    }

    #[tokio::test]
    async fn test_short_name_still_gets_full_code() {
        let (state, _) = test_support::state();
        let resp = call(&state, request("jo@x.com", "J", None)).await.expect("signup");
        assert_eq!(resp.referral_code.len(), 8);
        assert!(resp.referral_code.starts_with('J'));
    }
}
