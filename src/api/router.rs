use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{admin, auth, expense, health, installment, loan, production, two_factor, worker};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Session protocol
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/auth/2fa/enable", post(two_factor::enable))
        .route("/api/auth/2fa/verify", post(two_factor::verify))
        .route("/api/auth/2fa/disable", post(two_factor::disable))

        // Account lifecycle (admin only)
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/approve", post(admin::approve_user))
        .route("/api/admin/users/{id}/reject", post(admin::reject_user))
        .route("/api/admin/users/{id}/permissions", put(admin::update_permissions))
        .route("/api/admin/users/{id}", axum::routing::delete(admin::delete_user))

        // Workers
        .route("/api/workers", get(worker::list_workers).post(worker::create_worker))
        .route("/api/workers/export", get(worker::export_workers))
        .route("/api/workers/{id}", get(worker::get_worker).put(worker::update_worker).delete(worker::delete_worker))

        // Loans & installments
        .route("/api/loans", get(loan::list_loans).post(loan::create_loan))
        .route("/api/loans/export", get(loan::export_loans))
        .route("/api/loans/{id}", get(loan::get_loan).put(loan::update_loan).delete(loan::delete_loan))
        .route("/api/installments", get(installment::list_installments).post(installment::create_installment))
        .route("/api/installments/export", get(installment::export_installments))
        .route("/api/installments/{id}", get(installment::get_installment).put(installment::update_installment).delete(installment::delete_installment))

        // Expenses & production records
        .route("/api/expenses", get(expense::list_expenses).post(expense::create_expense))
        .route("/api/expenses/export", get(expense::export_expenses))
        .route("/api/expenses/{id}", get(expense::get_expense).put(expense::update_expense).delete(expense::delete_expense))
        .route("/api/baana", get(production::list_baana).post(production::create_baana))
        .route("/api/baana/export", get(production::export_baana))
        .route("/api/baana/{id}", get(production::get_baana).put(production::update_baana).delete(production::delete_baana))
        .route("/api/beam", get(production::list_beam).post(production::create_beam))
        .route("/api/beam/export", get(production::export_beam))
        .route("/api/beam/{id}", get(production::get_beam).put(production::update_beam).delete(production::delete_beam))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
