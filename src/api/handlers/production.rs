use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::dtos::requests::{
    CreateBaanaRequest, CreateBeamRequest, ListQuery, UpdateBaanaRequest, UpdateBeamRequest,
};
use crate::api::dtos::responses::{ExportResponse, MessageResponse, Paginated};
use crate::api::extractors::auth::{AuthUser, RequireDelete, RequireExport, RequireWrite};
use crate::domain::models::production::{Baana, Beam};
use crate::domain::ports::{Page, SortOrder};
use crate::error::AppError;
use crate::state::AppState;

fn export_page() -> Page {
    Page { page: 1, page_size: i64::MAX, sort: None, order: SortOrder::Asc }
}

pub async fn list_baana(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (records, total) = state.baana_repo.list(&page, query.from, query.to).await?;

    Ok(Json(Paginated::new(records, &page, total)))
}

pub async fn export_baana(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (records, _) = state.baana_repo.list(&export_page(), query.from, query.to).await?;

    Ok(Json(ExportResponse { data: records }))
}

pub async fn get_baana(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .baana_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Baana record not found".into()))?;

    Ok(Json(json!({ "item": record })))
}

pub async fn create_baana(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateBaanaRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.count <= 0.0 {
        return Err(AppError::Validation("Count must be positive".into()));
    }

    let record = Baana::new(payload.date, payload.count, payload.quality, payload.notes);
    let created = state.baana_repo.create(&record).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": created }))))
}

pub async fn update_baana(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBaanaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut record = state
        .baana_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Baana record not found".into()))?;

    if let Some(count) = payload.count {
        if count <= 0.0 {
            return Err(AppError::Validation("Count must be positive".into()));
        }
        record.count = count;
    }
    if let Some(date) = payload.date {
        record.date = date;
    }
    if let Some(quality) = payload.quality {
        record.quality = Some(quality);
    }
    if let Some(notes) = payload.notes {
        record.notes = Some(notes);
    }

    let updated = state.baana_repo.update(&record).await?;

    Ok(Json(json!({ "item": updated })))
}

pub async fn delete_baana(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.baana_repo.delete(&id).await?;

    Ok(Json(MessageResponse::new("Baana record deleted")))
}

pub async fn list_beam(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page_params();
    let (records, total) = state.beam_repo.list(&page, query.from, query.to).await?;

    Ok(Json(Paginated::new(records, &page, total)))
}

pub async fn export_beam(
    State(state): State<Arc<AppState>>,
    _export: RequireExport,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (records, _) = state.beam_repo.list(&export_page(), query.from, query.to).await?;

    Ok(Json(ExportResponse { data: records }))
}

pub async fn get_beam(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .beam_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Beam record not found".into()))?;

    Ok(Json(json!({ "item": record })))
}

pub async fn create_beam(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Json(payload): Json<CreateBeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.count <= 0.0 {
        return Err(AppError::Validation("Count must be positive".into()));
    }

    let record = Beam::new(payload.date, payload.count, payload.loom_no, payload.notes);
    let created = state.beam_repo.create(&record).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": created }))))
}

pub async fn update_beam(
    State(state): State<Arc<AppState>>,
    _write: RequireWrite,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut record = state
        .beam_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Beam record not found".into()))?;

    if let Some(count) = payload.count {
        if count <= 0.0 {
            return Err(AppError::Validation("Count must be positive".into()));
        }
        record.count = count;
    }
    if let Some(date) = payload.date {
        record.date = date;
    }
    if let Some(loom_no) = payload.loom_no {
        record.loom_no = Some(loom_no);
    }
    if let Some(notes) = payload.notes {
        record.notes = Some(notes);
    }

    let updated = state.beam_repo.update(&record).await?;

    Ok(Json(json!({ "item": updated })))
}

pub async fn delete_beam(
    State(state): State<Arc<AppState>>,
    _delete: RequireDelete,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.beam_repo.delete(&id).await?;

    Ok(Json(MessageResponse::new("Beam record deleted")))
}
