mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn expense_list_paginates_with_meta() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for day in 1..=25 {
        let response = app
            .post(
                "/api/expenses",
                Some(&admin.access_token),
                json!({
                    "date": format!("2024-03-{:02}", day),
                    "amount": day as f64 * 10.0,
                    "category": "yarn"
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = parse_body(
        app.get(
            "/api/expenses?page=2&pageSize=10&sort=date&order=asc",
            Some(&admin.access_token),
        )
        .await,
    )
    .await;
    assert_eq!(body["meta"]["total"], 25);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["pageSize"], 10);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    // Ascending date sort puts day 11 first on page 2.
    assert_eq!(rows[0]["date"], "2024-03-11");

    // Page size is clamped, never trusted.
    let huge = parse_body(
        app.get("/api/expenses?pageSize=100000", Some(&admin.access_token))
            .await,
    )
    .await;
    assert_eq!(huge["data"].as_array().unwrap().len(), 25);
    assert_eq!(huge["meta"]["pageSize"], 100);
}

#[tokio::test]
async fn expense_date_range_filter() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for date in ["2024-01-05", "2024-02-10", "2024-03-15"] {
        app.post(
            "/api/expenses",
            Some(&admin.access_token),
            json!({ "date": date, "amount": 100.0, "category": "dye" }),
        )
        .await;
    }

    let body = parse_body(
        app.get(
            "/api/expenses?from=2024-02-01&to=2024-02-28",
            Some(&admin.access_token),
        )
        .await,
    )
    .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["date"], "2024-02-10");
}

#[tokio::test]
async fn expense_rejects_nonpositive_amount() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for amount in [0.0, -5.0] {
        let response = app
            .post(
                "/api/expenses",
                Some(&admin.access_token),
                json!({ "date": "2024-03-01", "amount": amount, "category": "misc" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn extreme_page_numbers_yield_an_empty_page() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    app.post(
        "/api/workers",
        Some(&admin.access_token),
        json!({ "name": "Only", "phone": "9600000001", "joiningDate": "2024-01-01" }),
    )
    .await;

    // The largest representable page number must not take the request down;
    // it just runs past the data.
    let response = app
        .get(
            &format!("/api/workers?page={}&pageSize=100", i64::MAX),
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], 1);

    // Zero and negative pages clamp to the first page.
    let body = parse_body(app.get("/api/workers?page=-3", Some(&admin.access_token)).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn partial_update_preserves_unset_fields() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    let created = app
        .post(
            "/api/workers",
            Some(&admin.access_token),
            json!({
                "name": "Ramesh",
                "phone": "9700000001",
                "address": "Loom street 4",
                "joiningDate": "2024-01-01",
                "nationalId": "123456789012"
            }),
        )
        .await;
    let worker_id = parse_body(created).await["worker"]["id"].as_str().unwrap().to_string();

    let updated = app
        .put(
            &format!("/api/workers/{}", worker_id),
            Some(&admin.access_token),
            json!({ "name": "Ramesh K" }),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body = parse_body(updated).await;
    assert_eq!(body["worker"]["name"], "Ramesh K");
    assert_eq!(body["worker"]["address"], "Loom street 4");
    assert_eq!(body["worker"]["nationalId"], "123456789012");
    assert_eq!(body["worker"]["phone"], "9700000001");
}

#[tokio::test]
async fn worker_search_matches_name_and_phone() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for (name, phone) in [("Ramesh", "9200000001"), ("Suresh", "9200000002"), ("Mahesh", "9300000003")] {
        app.post(
            "/api/workers",
            Some(&admin.access_token),
            json!({ "name": name, "phone": phone, "joiningDate": "2024-01-01" }),
        )
        .await;
    }

    let by_name = parse_body(app.get("/api/workers?search=resh", Some(&admin.access_token)).await).await;
    assert_eq!(by_name["meta"]["total"], 2);

    let by_phone = parse_body(app.get("/api/workers?search=93000", Some(&admin.access_token)).await).await;
    assert_eq!(by_phone["meta"]["total"], 1);
    assert_eq!(by_phone["data"][0]["name"], "Mahesh");
}

#[tokio::test]
async fn duplicate_worker_phone_is_conflict() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    let first = app
        .post(
            "/api/workers",
            Some(&admin.access_token),
            json!({ "name": "One", "phone": "9400000001", "joiningDate": "2024-01-01" }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post(
            "/api/workers",
            Some(&admin.access_token),
            json!({ "name": "Two", "phone": "9400000001", "joiningDate": "2024-01-02" }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_body(second).await;
    assert_eq!(body["error"]["message"], "Phone number already in use");
}

#[tokio::test]
async fn worker_national_id_must_be_twelve_digits() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for national_id in ["12345", "12345678901a", "1234567890123"] {
        let response = app
            .post(
                "/api/workers",
                Some(&admin.access_token),
                json!({
                    "name": "W",
                    "phone": "9500000001",
                    "joiningDate": "2024-01-01",
                    "nationalId": national_id
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {}", national_id);
    }
}

#[tokio::test]
async fn baana_and_beam_crud_round_trip() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    let created = app
        .post(
            "/api/baana",
            Some(&admin.access_token),
            json!({ "date": "2024-04-01", "count": 12.0, "quality": "fine" }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let baana_id = parse_body(created).await["item"]["id"].as_str().unwrap().to_string();

    let updated = app
        .put(
            &format!("/api/baana/{}", baana_id),
            Some(&admin.access_token),
            json!({ "count": 15.0 }),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(parse_body(updated).await["item"]["count"], 15.0);

    let created = app
        .post(
            "/api/beam",
            Some(&admin.access_token),
            json!({ "date": "2024-04-02", "count": 3.0, "loomNo": "L-7" }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let beam_id = parse_body(created).await["item"]["id"].as_str().unwrap().to_string();

    let fetched = parse_body(
        app.get(&format!("/api/beam/{}", beam_id), Some(&admin.access_token))
            .await,
    )
    .await;
    assert_eq!(fetched["item"]["loomNo"], "L-7");

    let deleted = app
        .delete(&format!("/api/beam/{}", beam_id), Some(&admin.access_token))
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .get(&format!("/api/beam/{}", beam_id), Some(&admin.access_token))
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn production_counts_must_be_positive() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    let baana = app
        .post(
            "/api/baana",
            Some(&admin.access_token),
            json!({ "date": "2024-04-01", "count": 0.0 }),
        )
        .await;
    assert_eq!(baana.status(), StatusCode::BAD_REQUEST);

    let beam = app
        .post(
            "/api/beam",
            Some(&admin.access_token),
            json!({ "date": "2024-04-01", "count": -1.0 }),
        )
        .await;
    assert_eq!(beam.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_returns_the_full_filtered_set() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for day in 1..=30 {
        app.post(
            "/api/expenses",
            Some(&admin.access_token),
            json!({ "date": format!("2024-05-{:02}", day), "amount": 10.0, "category": "power" }),
        )
        .await;
    }

    let body = parse_body(app.get("/api/expenses/export", Some(&admin.access_token)).await).await;
    // Export ignores pagination entirely.
    assert_eq!(body["data"].as_array().unwrap().len(), 30);
    assert!(body.get("meta").is_none());
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let app = TestApp::new().await;
    let admin = app.register("Admin", "admin@example.com", "Secr3t!").await;

    for path in [
        "/api/workers/missing",
        "/api/loans/missing",
        "/api/installments/missing",
        "/api/expenses/missing",
        "/api/baana/missing",
        "/api/beam/missing",
    ] {
        let get = app.get(path, Some(&admin.access_token)).await;
        assert_eq!(get.status(), StatusCode::NOT_FOUND, "GET {}", path);

        let delete = app.delete(path, Some(&admin.access_token)).await;
        assert_eq!(delete.status(), StatusCode::NOT_FOUND, "DELETE {}", path);
    }
}
