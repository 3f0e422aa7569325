//! Integration test: confirmation attempts are limited per caller address
//! and malformed codes never reach storage.

use plug_integration_tests::{signup_body, TestServer};
use serde_json::json;

#[tokio::test]
async fn sixth_attempt_from_same_address_is_rejected() {
    let (server, _) = TestServer::start().await;
    let (_, ada) = server
        .post("/api/waitlist", &signup_body("ada@example.com", "Ada", None))
        .await;
    let code = ada["referralCode"].clone();

    for attempt in 0..5 {
        let (status, body) = server
            .post_from("/api/confirm-email", &json!({ "code": "ZZZ99999" }), Some("203.0.113.7"))
            .await;
        assert_eq!(status, 400, "attempt {attempt}: {body}");
        assert_eq!(body["error"], "invalid or expired confirmation code");
    }

    // Even a correct code is refused once the window is full.
    let (status, body) = server
        .post_from(
            "/api/confirm-email",
            &json!({ "code": code }),
            Some("203.0.113.7, 10.0.0.1"),
        )
        .await;
    assert_eq!(status, 429);
    assert_eq!(body["error"], "too many confirmation attempts please try again later");

    // Another address still gets through.
    let (status, body) = server
        .post_from("/api/confirm-email", &json!({ "code": code }), Some("198.51.100.1"))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["alreadyConfirmed"], false);
}

#[tokio::test]
async fn code_shape_errors() {
    let (server, _) = TestServer::start().await;

    let cases = [
        (json!({}), "invalid confirmation code"),
        (json!({ "code": 42 }), "invalid confirmation code"),
        (json!({ "code": "" }), "invalid confirmation code"),
        (json!({ "code": "abc12345" }), "invalid confirmation code format"),
        (json!({ "code": "ABC1234" }), "invalid confirmation code format"),
        (json!({ "code": "ABC 1234" }), "invalid confirmation code format"),
    ];

    for (i, (body, expected)) in cases.iter().enumerate() {
        // Distinct callers so the limiter stays out of the way.
        let caller = format!("192.0.2.{i}");
        let (status, err) = server
            .post_from("/api/confirm-email", body, Some(caller.as_str()))
            .await;
        assert_eq!(status, 400, "{body}");
        assert_eq!(err["error"], *expected, "{body}");
    }
}

#[tokio::test]
async fn callers_without_address_headers_share_a_bucket() {
    let (server, _) = TestServer::start().await;
    for _ in 0..5 {
        let (status, _) = server
            .post("/api/confirm-email", &json!({ "code": "ZZZ99999" }))
            .await;
        assert_eq!(status, 400);
    }
    let (status, _) = server
        .post("/api/confirm-email", &json!({ "code": "ZZZ99999" }))
        .await;
    assert_eq!(status, 429);
    assert_eq!(server.state.confirm_limiter.tracked_keys().await, 1);
}
