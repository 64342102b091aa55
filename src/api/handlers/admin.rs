use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ApproveUserRequest, ListUsersQuery, RejectUserRequest, UpdatePermissionsRequest};
use crate::api::dtos::responses::{MessageResponse, UserResponse, UserView, UsersResponse};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::user::{AccountStatus, Permissions, Role};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list(query.status).await?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserView::from).collect(),
    }))
}

pub async fn approve_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    Json(payload): Json<ApproveUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let target = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.account_status == AccountStatus::Approved {
        return Err(AppError::Domain {
            status: StatusCode::BAD_REQUEST,
            code: "ALREADY_APPROVED",
            message: "User is already approved".into(),
        });
    }

    let role = payload.role.unwrap_or(target.role);
    let permissions = payload.permissions.unwrap_or_else(Permissions::read_only);

    // apply_approval bumps token_version so the user's next refresh picks up
    // the new grants via a fresh login.
    let updated = state
        .user_repo
        .apply_approval(&user_id, role, permissions, &admin.sub)
        .await?;

    info!(user_id = %user_id, approver = %admin.sub, "User approved");

    Ok(Json(UserResponse { user: UserView::from(&updated) }))
}

pub async fn reject_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    Json(payload): Json<RejectUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("A rejection reason is required".into()));
    }

    // The account is kept so it can be reconsidered later.
    let updated = state.user_repo.apply_rejection(&user_id, payload.reason.trim()).await?;

    info!(user_id = %user_id, admin = %admin.sub, "User rejected");

    Ok(Json(UserResponse { user: UserView::from(&updated) }))
}

pub async fn update_permissions(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdatePermissionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let target = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.account_status != AccountStatus::Approved {
        return Err(AppError::Domain {
            status: StatusCode::BAD_REQUEST,
            code: "NOT_APPROVED",
            message: "User must be approved before permissions can be changed".into(),
        });
    }

    let role = payload.role.unwrap_or(target.role);
    let updated = state
        .user_repo
        .apply_grants(&user_id, role, payload.permissions)
        .await?;

    info!(user_id = %user_id, admin = %admin.sub, "Permissions updated");

    Ok(Json(UserResponse { user: UserView::from(&updated) }))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if admin.sub == user_id {
        return Err(AppError::Forbidden("You cannot delete your own account".into()));
    }

    let target = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.role == Role::Admin {
        return Err(AppError::Forbidden("Admin accounts cannot be deleted".into()));
    }

    state.user_repo.delete(&user_id).await?;

    info!(user_id = %user_id, admin = %admin.sub, "User deleted");

    Ok(Json(MessageResponse::new("User deleted")))
}
