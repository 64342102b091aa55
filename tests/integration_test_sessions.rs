mod common;

use axum::http::StatusCode;
use common::{parse_body, refresh_cookie_from, TestApp};

#[tokio::test]
async fn refresh_rotates_the_token_pair() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    let response = app
        .request("POST", "/api/auth/refresh", None, Some(&session.refresh_cookie), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let rotated_cookie = refresh_cookie_from(&response);
    assert_ne!(rotated_cookie, session.refresh_cookie);

    let body = parse_body(response).await;
    let new_access = body["accessToken"].as_str().unwrap();
    assert!(!new_access.is_empty());
    // Refresh returns only the access token; the user payload is not re-sent.
    assert!(body.get("user").is_none());

    // The rotated access token is usable.
    let me = app.get("/api/auth/me", Some(new_access)).await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_requires_the_cookie() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    let no_cookie = app.request("POST", "/api/auth/refresh", None, None, None).await;
    assert_eq!(no_cookie.status(), StatusCode::UNAUTHORIZED);

    // A refresh token in the body or header is never accepted.
    let bearer_only = app
        .request("POST", "/api/auth/refresh", Some(&session.access_token), None, None)
        .await;
    assert_eq!(bearer_only.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("POST", "/api/auth/refresh", None, Some("pl_refresh=garbage"), None)
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_outstanding_refresh_tokens() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&session.refresh_cookie), None)
        .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    // The cookie the client still holds is now permanently unusable even
    // though the token itself has not expired.
    let refresh = app
        .request("POST", "/api/auth/refresh", None, Some(&session.refresh_cookie), None)
        .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_is_idempotent_and_tolerant() {
    let app = TestApp::new().await;

    // No cookie at all.
    let response = app.request("POST", "/api/auth/logout", None, None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Garbled cookie is swallowed, not surfaced.
    let response = app
        .request("POST", "/api/auth/logout", None, Some("pl_refresh=garbage"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn refresh_fails_after_account_deletion() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;
    let member = app.register("Member", "member@example.com", "Secr3t!").await;

    let member_id = member.user["id"].as_str().unwrap();
    let deleted = app
        .delete(&format!("/api/admin/users/{}", member_id), Some(&admin.access_token))
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let refresh = app
        .request("POST", "/api/auth/refresh", None, Some(&member.refresh_cookie), None)
        .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    // The still-unexpired access token hits a deleted account.
    let me = app.get("/api/auth/me", Some(&member.access_token)).await;
    assert_eq!(me.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_rotated_cookie_still_refreshes_until_version_bump() {
    let app = TestApp::new().await;
    let session = app.register("Alice", "alice@example.com", "Secr3t!").await;

    // Rotate once; the pre-rotation cookie is still version-valid (rotation
    // does not bump token_version), but logout kills both.
    let first = app
        .request("POST", "/api/auth/refresh", None, Some(&session.refresh_cookie), None)
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let rotated_cookie = refresh_cookie_from(&first);

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&rotated_cookie), None)
        .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    for cookie in [&session.refresh_cookie, &rotated_cookie] {
        let refresh = app.request("POST", "/api/auth/refresh", None, Some(cookie), None).await;
        assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
    }
}
