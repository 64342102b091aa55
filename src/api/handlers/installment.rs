use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateInstallmentRequest, ListQuery, UpdateInstallmentRequest};
use crate::api::dtos::responses::{ExportResponse, MessageResponse, Paginated};
use crate::api::extractors::auth::{AuthUser, RequireDelete, RequireExport, RequireWrite};
use crate::domain::models::loan::Installment;
use crate::domain::ports::{Page, SortOrder};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_installments(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (installments, total) = state
        .installment_repo
        .list(&page, query.loan_id.as_deref())
        .await?;

    Ok(Json(Paginated::new(installments, &page, total)))
}

pub async fn export_installments(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page { page: 1, page_size: i64::MAX, sort: None, order: SortOrder::Asc };
    let (installments, _) = state
        .installment_repo
        .list(&page, query.loan_id.as_deref())
        .await?;

    Ok(Json(ExportResponse { data: installments }))
}

pub async fn get_installment(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let installment = state
        .installment_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Installment not found".into()))?;

    Ok(Json(json!({ "installment": installment })))
}

pub async fn create_installment(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateInstallmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount <= 0.0 {
        return Err(AppError::Validation("Amount must be positive".into()));
    }

    if state.loan_repo.find_by_id(&payload.loan_id).await?.is_none() {
        return Err(AppError::NotFound("Loan not found".into()));
    }

    let installment = Installment::new(
        payload.loan_id,
        payload.date,
        payload.amount,
        payload.method,
        payload.notes,
    );
    let created = state.installment_repo.create(&installment).await?;

    info!(installment_id = %created.id, loan_id = %created.loan_id, "Installment created");

    Ok((StatusCode::CREATED, Json(json!({ "installment": created }))))
}

pub async fn update_installment(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInstallmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut installment = state
        .installment_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Installment not found".into()))?;

    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return Err(AppError::Validation("Amount must be positive".into()));
        }
        installment.amount = amount;
    }
    if let Some(date) = payload.date {
        installment.date = date;
    }
    if let Some(method) = payload.method {
        installment.method = Some(method);
    }
    if let Some(notes) = payload.notes {
        installment.notes = Some(notes);
    }

    let updated = state.installment_repo.update(&installment).await?;

    Ok(Json(json!({ "installment": updated })))
}

pub async fn delete_installment(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.installment_repo.delete(&id).await?;

    Ok(Json(MessageResponse::new("Installment deleted")))
}
