//! Signup validation.
//!
//! Fields are checked in form order and the first failure wins, so the
//! caller always sees one actionable message.

use plug_types::api::SignupRequest;
use plug_types::{ProviderKind, UserType};

use crate::error::{ApiError, ApiResult};

/// Domains of throwaway mailbox services.
pub const DISPOSABLE_DOMAINS: [&str; 4] = [
    "tempmail.com",
    "guerrillamail.com",
    "10minutemail.com",
    "throwaway.email",
];

/// A signup that passed validation, normalized for storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidSignup {
    /// Trimmed and lowercased.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub services: Vec<String>,
    /// Only set for providers.
    pub provider_type: Option<ProviderKind>,
    pub location: String,
    pub suggestion: Option<String>,
    pub referred_by: Option<String>,
}

fn required(value: &str, message: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |part: &str| !part.is_empty() && !part.contains('@') && !part.contains(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Whether the address belongs to a known throwaway mailbox service.
pub fn is_disposable(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| {
            let domain = domain.to_ascii_lowercase();
            DISPOSABLE_DOMAINS.contains(&domain.as_str())
        })
        .unwrap_or(false)
}

/// Validate a signup body.
pub fn validate_signup(req: &SignupRequest) -> ApiResult<ValidSignup> {
    let first_name = required(&req.first_name, "please enter your first name")?;
    let last_name = required(&req.last_name, "please enter your last name")?;
    let email = required(&req.email, "please enter your email")?;
    if !is_valid_email(&email) {
        return Err(ApiError::Validation(
            "please enter a valid email address".into(),
        ));
    }
    if is_disposable(&email) {
        return Err(ApiError::Validation(
            "disposable email addresses are not allowed".into(),
        ));
    }

    let user_type: UserType = req.user_type.parse().map_err(|_| {
        ApiError::Validation("please select if you're a user or provider".into())
    })?;

    let services: Vec<String> = req
        .services
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if services.is_empty() {
        return Err(ApiError::Validation(
            "please select at least one service".into(),
        ));
    }

    let provider_type = match user_type {
        UserType::Provider => {
            let kind = req
                .provider_type
                .as_deref()
                .and_then(|v| v.parse::<ProviderKind>().ok())
                .ok_or_else(|| ApiError::Validation("please select your provider type".into()))?;
            Some(kind)
        }
        UserType::User => None,
    };

    let location = required(&req.location, "please select your location")?;

    Ok(ValidSignup {
        email: email.to_lowercase(),
        first_name,
        last_name,
        user_type,
        services,
        provider_type,
        location,
        suggestion: optional(req.suggestion.as_deref()),
        referred_by: optional(req.referred_by.as_deref()),
    })
}
