use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::auth::AccessClaims;
use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::state::AppState;

/// Composable request guards. `AuthUser` is the base gate: a valid bearer
/// access token. `AdminUser` adds the coarse role check, and the Require*
/// guards add the fine permission checks against the flags snapshotted into
/// the token at issue time. A handler composes them by naming the strictest
/// guard it needs in its signature.
pub struct AuthUser(pub AccessClaims);

pub struct AdminUser(pub AccessClaims);

pub struct RequireWrite(pub AccessClaims);

pub struct RequireDelete(pub AccessClaims);

pub struct RequireExport(pub AccessClaims);

fn bearer_claims<S>(parts: &Parts, state: &S) -> Result<AccessClaims, AppError>
where
    Arc<AppState>: FromRef<S>,
{
    let header_val = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = header_val.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
    let claims = app_state.token_service.verify_access(token)?;

    Span::current().record("user_id", claims.sub.as_str());

    Ok(claims)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(bearer_claims(parts, state)?))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if claims.role != Role::Admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser(claims))
    }
}

impl<S> FromRequestParts<S> for RequireWrite
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if !claims.permissions.can_write {
            return Err(AppError::Forbidden(
                "Write permission required. Contact your administrator.".into(),
            ));
        }
        Ok(RequireWrite(claims))
    }
}

impl<S> FromRequestParts<S> for RequireDelete
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if !claims.permissions.can_delete {
            return Err(AppError::Forbidden(
                "Delete permission required. Contact your administrator.".into(),
            ));
        }
        Ok(RequireDelete(claims))
    }
}

impl<S> FromRequestParts<S> for RequireExport
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if !claims.permissions.can_export {
            return Err(AppError::Forbidden(
                "Export permission required. Contact your administrator.".into(),
            ));
        }
        Ok(RequireExport(claims))
    }
}
