use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::info;

use crate::api::dtos::requests::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::api::dtos::responses::{AccessTokenResponse, AuthResponse, MessageResponse, UserResponse, UserView};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::User;
use crate::domain::services::{password, two_factor};
use crate::error::AppError;
use crate::state::AppState;

pub const REFRESH_COOKIE: &str = "pl_refresh";
const AUTH_COOKIE_PATH: &str = "/api/auth";
const MIN_PASSWORD_LEN: usize = 6;

pub async fn register(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Domain {
            status: StatusCode::CONFLICT,
            code: "EMAIL_IN_USE",
            message: "Email already in use".into(),
        });
    }

    let password_hash = password::hash_password(&payload.password)?;

    // The very first account becomes the active admin; everyone after starts
    // as a pending viewer until an admin acts.
    let first_user = state.user_repo.count().await? == 0;
    let user = User::new(payload.name.trim().to_string(), payload.email, password_hash, first_user);
    let created = state.user_repo.create(&user).await?;

    let access_token = state.token_service.issue_access(&created)?;
    let refresh_token = state.token_service.issue_refresh(&created)?;
    set_refresh_cookie(&cookies, &refresh_token, state.config.cookie_secure);

    info!(user_id = %created.id, first_user, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&created),
            access_token,
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Unknown email, wrong password and wrong second factor fail identically.
    let user = state
        .user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    if user.totp_enabled {
        check_second_factor(&state, &user, payload.totp_code.as_deref()).await?;
    }

    state.user_repo.touch_last_login(&user.id).await?;

    let access_token = state.token_service.issue_access(&user)?;
    let refresh_token = state.token_service.issue_refresh(&user)?;
    set_refresh_cookie(&cookies, &refresh_token, state.config.cookie_secure);

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        access_token,
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;
    let claims = state.token_service.verify_refresh(refresh_cookie.value())?;

    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // The live comparison that makes logout/password-change/grant-change
    // revoke refresh capability immediately.
    if claims.token_version != user.token_version {
        return Err(AppError::Unauthorized);
    }

    let access_token = state.token_service.issue_access(&user)?;
    let new_refresh = state.token_service.issue_refresh(&user)?;
    set_refresh_cookie(&cookies, &new_refresh, state.config.cookie_secure);

    info!(user_id = %user.id, "Session refreshed");

    Ok(Json(AccessTokenResponse { access_token }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    // Best effort: a garbled cookie still logs out cleanly.
    if let Some(cookie) = cookies.get(REFRESH_COOKIE) {
        if let Ok(claims) = state.token_service.verify_refresh(cookie.value()) {
            let _ = state.user_repo.bump_token_version(&claims.sub).await;
        }
    }

    clear_refresh_cookie(&cookies);

    info!("User logged out");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(UserResponse { user: UserView::from(&user) }))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.is_none() && payload.avatar.is_none() {
        return Err(AppError::Validation("Nothing to update".into()));
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
    }

    let updated = state
        .user_repo
        .update_profile(&claims.sub, payload.name.as_deref(), payload.avatar.as_deref())
        .await?;

    Ok(Json(UserResponse { user: UserView::from(&updated) }))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }

    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !password::verify_password(&payload.current_password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let new_hash = password::hash_password(&payload.new_password)?;
    // set_password also bumps token_version, revoking every refresh token
    // issued before the change.
    state.user_repo.set_password(&user.id, &new_hash).await?;

    info!(user_id = %user.id, "Password changed");

    Ok(Json(MessageResponse::new(
        "Password changed. Other sessions have been signed out.",
    )))
}

fn invalid_credentials() -> AppError {
    AppError::Domain {
        status: StatusCode::UNAUTHORIZED,
        code: "INVALID_CREDENTIALS",
        message: "Invalid credentials".into(),
    }
}

async fn check_second_factor(
    state: &Arc<AppState>,
    user: &User,
    code: Option<&str>,
) -> Result<(), AppError> {
    let code = code.ok_or_else(invalid_credentials)?;
    let secret = user.totp_secret.as_deref().ok_or_else(invalid_credentials)?;

    if two_factor::check_code(secret, &user.email, code)? {
        return Ok(());
    }

    // Fall back to backup codes; a matched code is consumed.
    let mut hashes: Vec<String> = serde_json::from_str(&user.backup_codes).unwrap_or_default();
    let code_hash = two_factor::hash_backup_code(code);

    if let Some(pos) = hashes.iter().position(|h| h == &code_hash) {
        hashes.remove(pos);
        let serialized = serde_json::to_string(&hashes).map_err(|_| AppError::Internal)?;
        state
            .user_repo
            .set_two_factor(&user.id, user.totp_secret.as_deref(), true, &serialized)
            .await?;
        return Ok(());
    }

    Err(invalid_credentials())
}

fn set_refresh_cookie(cookies: &Cookies, token: &str, secure: bool) {
    let mut cookie = Cookie::new(REFRESH_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path(AUTH_COOKIE_PATH);
    cookie.set_max_age(Duration::days(7));
    cookies.add(cookie);
}

fn clear_refresh_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path(AUTH_COOKIE_PATH).into());
}
