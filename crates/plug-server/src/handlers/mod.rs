//! Request handlers, one module per API area.

pub mod confirm;
pub mod email;
pub mod feed;
pub mod referral;
pub mod signup;

use axum::http::HeaderMap;
use axum::Json;
use plug_types::api::HealthResponse;

/// Caller address used for rate limiting.
///
/// First entry of `x-forwarded-for`, else `x-real-ip`, else `"unknown"`.
/// Callers that share the fallback share one bucket.
pub fn caller_address(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip").map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// `GET /healthz`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
