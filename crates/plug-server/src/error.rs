//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! chosen by variant. Internal failures log their detail and show the caller
//! only the public message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use plug_db::DbError;
use plug_types::api::ErrorBody;
use tracing::error;

/// Error types returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A request field failed validation.
    #[error("{0}")]
    Validation(String),

    /// The email is already on the waitlist.
    #[error("this email is already on the waitlist")]
    Duplicate,

    /// No usable confirmation code in the body.
    #[error("invalid confirmation code")]
    InvalidCode,

    /// The confirmation code is not shaped like a referral code.
    #[error("invalid confirmation code format")]
    InvalidCodeFormat,

    /// The confirmation code matches nobody.
    #[error("invalid or expired confirmation code")]
    ExpiredCode,

    /// A lookup found nothing.
    #[error("{0}")]
    NotFound(String),

    /// The caller exceeded the attempt limit.
    #[error("too many confirmation attempts please try again later")]
    RateLimited,

    /// Storage or delivery failure.
    #[error("{public}")]
    Internal {
        /// Shown to the caller.
        public: String,
        /// Logged only.
        detail: String,
    },
}

/// Convenience result type for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Internal failure with a caller-facing message and a logged cause.
    pub fn internal(public: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            public: public.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Duplicate
            | ApiError::InvalidCode
            | ApiError::InvalidCodeFormat
            | ApiError::ExpiredCode => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { public, detail } = &self {
            error!(%detail, "{public}");
        }
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::internal("internal server error", err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Validation(format!("invalid request body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Duplicate.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ExpiredCode.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("Email not found in waitlist".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::internal("failed", "boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        let err: ApiError = DbError::NotFound("waitlist row".into()).into();
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::RateLimited.to_string(),
            "too many confirmation attempts please try again later"
        );
        assert_eq!(
            ApiError::InvalidCodeFormat.to_string(),
            "invalid confirmation code format"
        );
    }
}
