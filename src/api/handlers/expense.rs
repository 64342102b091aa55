use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::dtos::requests::{CreateExpenseRequest, ListQuery, UpdateExpenseRequest};
use crate::api::dtos::responses::{ExportResponse, MessageResponse, Paginated};
use crate::api::extractors::auth::{AuthUser, RequireDelete, RequireExport, RequireWrite};
use crate::domain::models::production::Expense;
use crate::domain::ports::{Page, SortOrder};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (expenses, total) = state.expense_repo.list(&page, query.from, query.to).await?;

    Ok(Json(Paginated::new(expenses, &page, total)))
}

pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page { page: 1, page_size: i64::MAX, sort: None, order: SortOrder::Asc };
    let (expenses, _) = state.expense_repo.list(&page, query.from, query.to).await?;

    Ok(Json(ExportResponse { data: expenses }))
}

pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let expense = state
        .expense_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense not found".into()))?;

    Ok(Json(json!({ "expense": expense })))
}

pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount <= 0.0 {
        return Err(AppError::Validation("Amount must be positive".into()));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::Validation("Category is required".into()));
    }

    let expense = Expense::new(
        payload.date,
        payload.amount,
        payload.category.trim().to_string(),
        payload.notes,
    );
    let created = state.expense_repo.create(&expense).await?;

    Ok((StatusCode::CREATED, Json(json!({ "expense": created }))))
}

pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut expense = state
        .expense_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense not found".into()))?;

    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return Err(AppError::Validation("Amount must be positive".into()));
        }
        expense.amount = amount;
    }
    if let Some(date) = payload.date {
        expense.date = date;
    }
    if let Some(category) = payload.category {
        if category.trim().is_empty() {
            return Err(AppError::Validation("Category cannot be empty".into()));
        }
        expense.category = category.trim().to_string();
    }
    if let Some(notes) = payload.notes {
        expense.notes = Some(notes);
    }

    let updated = state.expense_repo.update(&expense).await?;

    Ok(Json(json!({ "expense": updated })))
}

pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.expense_repo.delete(&id).await?;

    Ok(Json(MessageResponse::new("Expense deleted")))
}
