mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

fn worker_payload(phone: &str) -> serde_json::Value {
    json!({
        "name": "Ram Kumar",
        "phone": phone,
        "address": "Loom street 4",
        "joiningDate": "2024-03-01"
    })
}

#[tokio::test]
async fn pending_user_reads_but_cannot_mutate() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "Secr3t!").await;
    let bob = app.register("Bob", "bob@example.com", "Secr3t!").await;

    // Reads are open to any authenticated user.
    let list = app.get("/api/workers", Some(&bob.access_token)).await;
    assert_eq!(list.status(), StatusCode::OK);

    // Each denied capability names itself.
    let write = app
        .post("/api/workers", Some(&bob.access_token), worker_payload("9000000001"))
        .await;
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
    let body = parse_body(write).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("Write permission"));

    let delete = app.delete("/api/workers/some-id", Some(&bob.access_token)).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
    let body = parse_body(delete).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("Delete permission"));

    let export = app.get("/api/workers/export", Some(&bob.access_token)).await;
    assert_eq!(export.status(), StatusCode::FORBIDDEN);
    let body = parse_body(export).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("Export permission"));
}

#[tokio::test]
async fn revoked_write_outlives_the_old_access_token() {
    let app = TestApp::new().await;
    let (admin, bob) = app
        .admin_and_approved_user(json!({ "canRead": true, "canWrite": true }))
        .await;

    let created = app
        .post("/api/workers", Some(&bob.access_token), worker_payload("9000000002"))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    // Admin revokes write while bob's token is still live.
    let bob_id = bob.user["id"].as_str().unwrap();
    let response = app
        .put(
            &format!("/api/admin/users/{}/permissions", bob_id),
            Some(&admin.access_token),
            json!({ "permissions": { "canRead": true, "canWrite": false } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The stateless access token still carries the old snapshot, so writes
    // keep succeeding until it expires.
    let still_allowed = app
        .post("/api/workers", Some(&bob.access_token), worker_payload("9000000003"))
        .await;
    assert_eq!(still_allowed.status(), StatusCode::CREATED);

    // But the refresh path re-checks the live token_version and refuses.
    let refresh = app
        .request("POST", "/api/auth/refresh", None, Some(&bob.refresh_cookie), None)
        .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    // Re-login picks up the revocation.
    let bob = app.login("member@example.com", "Secr3t!").await;
    let denied = app
        .post("/api/workers", Some(&bob.access_token), worker_payload("9000000004"))
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn export_permission_gates_export_endpoints() {
    let app = TestApp::new().await;
    let (_admin, bob) = app
        .admin_and_approved_user(json!({ "canRead": true, "canWrite": true, "canExport": true }))
        .await;

    app.post("/api/workers", Some(&bob.access_token), worker_payload("9000000005"))
        .await;

    let export = app.get("/api/workers/export", Some(&bob.access_token)).await;
    assert_eq!(export.status(), StatusCode::OK);
    let body = parse_body(export).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_permission_is_distinct_from_write() {
    let app = TestApp::new().await;
    let (_admin, bob) = app
        .admin_and_approved_user(json!({ "canRead": true, "canWrite": true }))
        .await;

    let created = app
        .post("/api/workers", Some(&bob.access_token), worker_payload("9000000006"))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = parse_body(created).await;
    let worker_id = body["worker"]["id"].as_str().unwrap().to_string();

    let denied = app
        .delete(&format!("/api/workers/{}", worker_id), Some(&bob.access_token))
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}
