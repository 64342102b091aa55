mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use powerlink_backend::domain::services::two_factor;
use serde_json::json;

/// Runs the full enable+verify handshake and returns the backup codes.
async fn enable_two_factor(app: &TestApp, access_token: &str, email: &str) -> (String, Vec<String>) {
    let response = app
        .request("POST", "/api/auth/2fa/enable", Some(access_token), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    let secret = body["secret"].as_str().unwrap().to_string();
    assert!(body["otpauthUrl"].as_str().unwrap().starts_with("otpauth://totp/"));

    let code = two_factor::build_totp(&secret, email)
        .unwrap()
        .generate_current()
        .unwrap();
    let response = app
        .post("/api/auth/2fa/verify", Some(access_token), json!({ "code": code }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;

    let backup_codes: Vec<String> = body["backupCodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap().to_string())
        .collect();
    assert_eq!(backup_codes.len(), 8);

    (secret, backup_codes)
}

#[tokio::test]
async fn login_requires_totp_once_enabled() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;
    let (secret, _) = enable_two_factor(&app, &session.access_token, "alice@example.com").await;

    // Correct password alone is no longer enough.
    let without_code = app
        .post("/api/auth/login", None, json!({ "email": "alice@example.com", "password": "Secr3t!" }))
        .await;
    assert_eq!(without_code.status(), StatusCode::UNAUTHORIZED);

    let wrong_code = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "Secr3t!", "totpCode": "000000" }),
        )
        .await;
    assert_eq!(wrong_code.status(), StatusCode::UNAUTHORIZED);

    let code = two_factor::build_totp(&secret, "alice@example.com")
        .unwrap()
        .generate_current()
        .unwrap();
    let with_code = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "Secr3t!", "totpCode": code }),
        )
        .await;
    assert_eq!(with_code.status(), StatusCode::OK);
}

#[tokio::test]
async fn backup_code_works_exactly_once() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;
    let (_, backup_codes) = enable_two_factor(&app, &session.access_token, "alice@example.com").await;

    let payload = json!({
        "email": "alice@example.com",
        "password": "Secr3t!",
        "totpCode": backup_codes[0]
    });

    let first = app.post("/api/auth/login", None, payload.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Consumed on use.
    let second = app.post("/api/auth/login", None, payload).await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);

    // The remaining codes are unaffected.
    let next = app
        .post(
            "/api/auth/login",
            None,
            json!({
                "email": "alice@example.com",
                "password": "Secr3t!",
                "totpCode": backup_codes[1]
            }),
        )
        .await;
    assert_eq!(next.status(), StatusCode::OK);
}

#[tokio::test]
async fn enable_twice_is_a_domain_error() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;
    enable_two_factor(&app, &session.access_token, "alice@example.com").await;

    let response = app
        .request("POST", "/api/auth/2fa/enable", Some(&session.access_token), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"]["code"], "ALREADY_ENABLED");
}

#[tokio::test]
async fn verify_without_setup_is_rejected() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    let response = app
        .post("/api/auth/2fa/verify", Some(&session.access_token), json!({ "code": "123456" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_ENABLED");
}

#[tokio::test]
async fn verify_rejects_a_wrong_code_without_enabling() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    let response = app
        .request("POST", "/api/auth/2fa/enable", Some(&session.access_token), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/auth/2fa/verify", Some(&session.access_token), json!({ "code": "000000" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Login still works without a code; the factor never activated.
    let login = app
        .post("/api/auth/login", None, json!({ "email": "alice@example.com", "password": "Secr3t!" }))
        .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn disable_requires_the_password() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;
    enable_two_factor(&app, &session.access_token, "alice@example.com").await;

    let wrong = app
        .post("/api/auth/2fa/disable", Some(&session.access_token), json!({ "password": "nope00" }))
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/api/auth/2fa/disable", Some(&session.access_token), json!({ "password": "Secr3t!" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Plain password login works again.
    let login = app
        .post("/api/auth/login", None, json!({ "email": "alice@example.com", "password": "Secr3t!" }))
        .await;
    assert_eq!(login.status(), StatusCode::OK);

    // Disabling again reports the factor is off.
    let again = app
        .post("/api/auth/2fa/disable", Some(&session.access_token), json!({ "password": "Secr3t!" }))
        .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
}
