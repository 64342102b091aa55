use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateLoanRequest, ListQuery, UpdateLoanRequest};
use crate::api::dtos::responses::{ExportResponse, MessageResponse, Paginated};
use crate::api::extractors::auth::{AuthUser, RequireDelete, RequireExport, RequireWrite};
use crate::domain::models::loan::Loan;
use crate::domain::ports::{Page, SortOrder};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (loans, total) = state.loan_repo.list(&page, query.worker_id.as_deref()).await?;

    Ok(Json(Paginated::new(loans, &page, total)))
}

pub async fn export_loans(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page { page: 1, page_size: i64::MAX, sort: None, order: SortOrder::Asc };
    let (loans, _) = state.loan_repo.list(&page, query.worker_id.as_deref()).await?;

    Ok(Json(ExportResponse { data: loans }))
}

pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let loan = state
        .loan_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Loan not found".into()))?;

    Ok(Json(json!({ "loan": loan })))
}

pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateLoanRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount <= 0.0 {
        return Err(AppError::Validation("Amount must be positive".into()));
    }

    if state.worker_repo.find_by_id(&payload.worker_id).await?.is_none() {
        return Err(AppError::NotFound("Worker not found".into()));
    }

    let loan = Loan::new(payload.worker_id, payload.amount, payload.loan_date, payload.notes);
    let created = state.loan_repo.create(&loan).await?;

    info!(loan_id = %created.id, worker_id = %created.worker_id, "Loan created");

    Ok((StatusCode::CREATED, Json(json!({ "loan": created }))))
}

pub async fn update_loan(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLoanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut loan = state
        .loan_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Loan not found".into()))?;

    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return Err(AppError::Validation("Amount must be positive".into()));
        }
        loan.amount = amount;
    }
    if let Some(loan_date) = payload.loan_date {
        loan.loan_date = loan_date;
    }
    if let Some(notes) = payload.notes {
        loan.notes = Some(notes);
    }

    let updated = state.loan_repo.update(&loan).await?;

    Ok(Json(json!({ "loan": updated })))
}

pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.loan_repo.delete_cascade(&id).await?;

    Ok(Json(MessageResponse::new("Loan deleted")))
}
