use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use powerlink_backend::{
    api::router::create_router,
    config::Config,
    domain::services::token_service::TokenService,
    infra::repositories::{
        sqlite_expense_repo::SqliteExpenseRepo,
        sqlite_installment_repo::SqliteInstallmentRepo,
        sqlite_loan_repo::SqliteLoanRepo,
        sqlite_production_repo::{SqliteBaanaRepo, SqliteBeamRepo},
        sqlite_user_repo::SqliteUserRepo,
        sqlite_worker_repo::SqliteWorkerRepo,
    },
    state::AppState,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct AuthSession {
    pub access_token: String,
    pub refresh_cookie: String,
    pub user: Value,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            access_token_secret: "test-access-secret".to_string(),
            refresh_token_secret: "test-refresh-secret".to_string(),
            cookie_secure: false,
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            worker_repo: Arc::new(SqliteWorkerRepo::new(pool.clone())),
            loan_repo: Arc::new(SqliteLoanRepo::new(pool.clone())),
            installment_repo: Arc::new(SqliteInstallmentRepo::new(pool.clone())),
            expense_repo: Arc::new(SqliteExpenseRepo::new(pool.clone())),
            baana_repo: Arc::new(SqliteBaanaRepo::new(pool.clone())),
            beam_repo: Arc::new(SqliteBeamRepo::new(pool.clone())),
            token_service: Arc::new(TokenService::new(&config)),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        bearer: Option<&str>,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> axum::response::Response {
        self.request("GET", path, bearer, None, None).await
    }

    pub async fn post(&self, path: &str, bearer: Option<&str>, body: Value) -> axum::response::Response {
        self.request("POST", path, bearer, None, Some(body)).await
    }

    pub async fn put(&self, path: &str, bearer: Option<&str>, body: Value) -> axum::response::Response {
        self.request("PUT", path, bearer, None, Some(body)).await
    }

    pub async fn delete(&self, path: &str, bearer: Option<&str>) -> axum::response::Response {
        self.request("DELETE", path, bearer, None, None).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthSession {
        let response = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": password }),
            )
            .await;

        assert_eq!(response.status(), StatusCode::CREATED, "registration failed in test helper");
        session_from_response(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthSession {
        let response = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK, "login failed in test helper");
        session_from_response(response).await
    }

    /// Registers the first (admin) account plus a second account approved
    /// with the given permission payload, and returns (admin, member session).
    pub async fn admin_and_approved_user(&self, permissions: Value) -> (AuthSession, AuthSession) {
        let admin = self.register("Admin", "admin@example.com", "Secr3t!").await;
        let member = self.register("Member", "member@example.com", "Secr3t!").await;

        let member_id = member.user["id"].as_str().unwrap();
        let response = self
            .post(
                &format!("/api/admin/users/{}/approve", member_id),
                Some(&admin.access_token),
                serde_json::json!({ "permissions": permissions }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "approval failed in test helper");

        // Re-login so the member's access token carries the new grants.
        let member = self.login("member@example.com", "Secr3t!").await;
        (admin, member)
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn refresh_cookie_from(response: &axum::response::Response) -> String {
    let cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap())
        .find(|c| c.starts_with("pl_refresh="))
        .expect("No pl_refresh cookie set");

    cookie.split(';').next().unwrap().to_string()
}

async fn session_from_response(response: axum::response::Response) -> AuthSession {
    let refresh_cookie = refresh_cookie_from(&response);
    let body = parse_body(response).await;

    AuthSession {
        access_token: body["accessToken"].as_str().expect("No accessToken in body").to_string(),
        refresh_cookie,
        user: body["user"].clone(),
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
