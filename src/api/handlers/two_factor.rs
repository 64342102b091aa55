use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{TwoFactorDisableRequest, TwoFactorVerifyRequest};
use crate::api::dtos::responses::{MessageResponse, TwoFactorEnableResponse, TwoFactorVerifyResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::{password, two_factor};
use crate::error::AppError;
use crate::state::AppState;

pub async fn enable(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if user.totp_enabled {
        return Err(AppError::Domain {
            status: StatusCode::BAD_REQUEST,
            code: "ALREADY_ENABLED",
            message: "Two-factor authentication is already enabled".into(),
        });
    }

    // Stored disabled until the user proves they can produce a code.
    let secret = two_factor::generate_secret();
    state
        .user_repo
        .set_two_factor(&user.id, Some(&secret), false, "[]")
        .await?;

    let totp = two_factor::build_totp(&secret, &user.email)?;

    Ok(Json(TwoFactorEnableResponse {
        secret,
        otpauth_url: totp.get_url(),
    }))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<TwoFactorVerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let secret = user.totp_secret.as_deref().ok_or(AppError::Domain {
        status: StatusCode::BAD_REQUEST,
        code: "NOT_ENABLED",
        message: "Two-factor setup has not been started".into(),
    })?;

    if !two_factor::check_code(secret, &user.email, &payload.code)? {
        return Err(AppError::Validation("Invalid two-factor code".into()));
    }

    let (codes, hashes) = two_factor::generate_backup_codes();
    let serialized = serde_json::to_string(&hashes).map_err(|_| AppError::Internal)?;
    state
        .user_repo
        .set_two_factor(&user.id, Some(secret), true, &serialized)
        .await?;

    info!(user_id = %user.id, "Two-factor authentication enabled");

    Ok(Json(TwoFactorVerifyResponse {
        message: "Two-factor authentication enabled. Store these backup codes safely.".into(),
        backup_codes: codes,
    }))
}

pub async fn disable(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<TwoFactorDisableRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !user.totp_enabled && user.totp_secret.is_none() {
        return Err(AppError::Domain {
            status: StatusCode::BAD_REQUEST,
            code: "NOT_ENABLED",
            message: "Two-factor authentication is not enabled".into(),
        });
    }

    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    state.user_repo.set_two_factor(&user.id, None, false, "[]").await?;

    info!(user_id = %user.id, "Two-factor authentication disabled");

    Ok(Json(MessageResponse::new("Two-factor authentication disabled")))
}
