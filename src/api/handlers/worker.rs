use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateWorkerRequest, ListQuery, UpdateWorkerRequest};
use crate::api::dtos::responses::{ExportResponse, MessageResponse, Paginated};
use crate::api::extractors::auth::{AuthUser, RequireDelete, RequireExport, RequireWrite};
use crate::domain::models::worker::Worker;
use crate::domain::ports::{Page, SortOrder};
use crate::error::AppError;
use crate::state::AppState;

fn validate_national_id(national_id: &str) -> Result<(), AppError> {
    if national_id.len() != 12 || !national_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation("National ID must be exactly 12 digits".into()));
    }
    Ok(())
}

pub async fn list_workers(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (workers, total) = state.worker_repo.list(&page, query.search.as_deref()).await?;

    Ok(Json(Paginated::new(workers, &page, total)))
}

pub async fn export_workers(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page { page: 1, page_size: i64::MAX, sort: None, order: SortOrder::Asc };
    let (workers, _) = state.worker_repo.list(&page, query.search.as_deref()).await?;

    Ok(Json(ExportResponse { data: workers }))
}

pub async fn get_worker(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let worker = state
        .worker_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Worker not found".into()))?;

    Ok(Json(json!({ "worker": worker })))
}

pub async fn create_worker(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if payload.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone is required".into()));
    }
    if let Some(national_id) = &payload.national_id {
        validate_national_id(national_id)?;
    }

    if state.worker_repo.find_by_phone(payload.phone.trim()).await?.is_some() {
        return Err(AppError::Conflict("Phone number already in use".into()));
    }

    let worker = Worker::new(
        payload.name.trim().to_string(),
        payload.phone.trim().to_string(),
        payload.address,
        payload.joining_date,
        payload.national_id,
        payload.photo,
    );
    let created = state.worker_repo.create(&worker).await?;

    info!(worker_id = %created.id, "Worker created");

    Ok((StatusCode::CREATED, Json(json!({ "worker": created }))))
}

pub async fn update_worker(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut worker = state
        .worker_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Worker not found".into()))?;

    if let Some(national_id) = &payload.national_id {
        validate_national_id(national_id)?;
    }

    if let Some(phone) = &payload.phone {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AppError::Validation("Phone cannot be empty".into()));
        }
        if phone != worker.phone {
            if state.worker_repo.find_by_phone(phone).await?.is_some() {
                return Err(AppError::Conflict("Phone number already in use".into()));
            }
            worker.phone = phone.to_string();
        }
    }

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
        worker.name = name.trim().to_string();
    }
    if let Some(address) = payload.address {
        worker.address = Some(address);
    }
    if let Some(joining_date) = payload.joining_date {
        worker.joining_date = joining_date;
    }
    if let Some(national_id) = payload.national_id {
        worker.national_id = Some(national_id);
    }
    if let Some(photo) = payload.photo {
        worker.photo = Some(photo);
    }

    let updated = state.worker_repo.update(&worker).await?;

    Ok(Json(json!({ "worker": updated })))
}

pub async fn delete_worker(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Cascades through loans and installments inside one transaction; the
    // response is sent only after the whole cascade has committed.
    state.worker_repo.delete_cascade(&id).await?;

    Ok(Json(MessageResponse::new("Worker deleted")))
}
