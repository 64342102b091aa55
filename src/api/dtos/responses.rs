use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::user::{AccountStatus, Permissions, Role, User};
use crate::domain::ports::Page;

/// The only shape a user ever leaves the API in. Password hash, totp secret
/// and backup codes stay server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Permissions,
    pub account_status: AccountStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub avatar: Option<String>,
    pub totp_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            permissions: user.permissions,
            account_status: user.account_status,
            approved_by: user.approved_by.clone(),
            approved_at: user.approved_at,
            rejected_reason: user.rejected_reason.clone(),
            last_login: user.last_login,
            avatar: user.avatar.clone(),
            totp_enabled: user.totp_enabled,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserView,
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: UserView,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserView>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorEnableResponse {
    pub secret: String,
    pub otpauth_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorVerifyResponse {
    pub message: String,
    pub backup_codes: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: &Page, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta {
                page: page.page,
                page_size: page.page_size,
                total,
            },
        }
    }
}

/// Full filtered set, no pagination. Body of the export endpoints; turning
/// it into CSV is the client's concern.
#[derive(Serialize)]
pub struct ExportResponse<T> {
    pub data: Vec<T>,
}
