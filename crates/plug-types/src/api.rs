//! HTTP request and response payloads.
//!
//! Request fields are kept as loose strings so that validation can report
//! the first failing field with a friendly message instead of a generic
//! deserialization error.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/waitlist`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub services: Vec<String>,
    pub provider_type: Option<String>,
    pub location: String,
    pub suggestion: Option<String>,
    /// Referral code remembered from a `?ref=` visit.
    pub referred_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    pub position: u64,
    pub referral_code: String,
    pub referral_link: String,
}

/// Body of `POST /api/confirm-email`.
///
/// `code` stays untyped: a missing or non-string code is reported
/// differently from a malformed one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmRequest {
    pub code: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub success: bool,
    pub position: u64,
    pub already_confirmed: bool,
}

/// Body of `POST /api/send-confirmation`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendConfirmationRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub referral_code: Option<String>,
    pub user_type: Option<String>,
    pub services: Vec<String>,
}

/// Body of `POST /api/resend-confirmation`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResendRequest {
    pub email: Option<String>,
}

/// Response of the two email endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Body of `POST /api/referral-visits`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferralVisitRequest {
    pub referral_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Every non-2xx response carries this body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_camel_case() {
        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "email": "ada@x.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "userType": "user",
            "services": ["hair"],
            "location": "Lekki",
            "referredBy": "BOB12345"
        }))
        .expect("parse");
        assert_eq!(req.first_name, "Ada");
        assert_eq!(req.referred_by.as_deref(), Some("BOB12345"));
        assert!(req.provider_type.is_none());
    }

    #[test]
    fn test_signup_request_missing_fields_default() {
        let req: SignupRequest = serde_json::from_str("{}").expect("parse");
        assert!(req.email.is_empty());
        assert!(req.services.is_empty());
    }

    #[test]
    fn test_confirm_response_shape() {
        let body = serde_json::to_value(ConfirmResponse {
            success: true,
            position: 3,
            already_confirmed: false,
        })
        .expect("serialize");
        assert_eq!(body["alreadyConfirmed"], false);
        assert_eq!(body["position"], 3);
    }

    #[test]
    fn test_mail_response_omits_missing_id() {
        let body = serde_json::to_value(MailResponse {
            success: true,
            message_id: None,
        })
        .expect("serialize");
        assert!(body.get("messageId").is_none());
    }
}
