use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

/// Capability flags assigned at approval time, independent of role.
/// Reads are implicit for any authenticated user; these gate mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
    pub can_export: bool,
}

impl Permissions {
    pub fn none() -> Self {
        Self { can_read: false, can_write: false, can_delete: false, can_export: false }
    }

    pub fn read_only() -> Self {
        Self { can_read: true, can_write: false, can_delete: false, can_export: false }
    }

    pub fn all() -> Self {
        Self { can_read: true, can_write: true, can_delete: true, can_export: true }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[sqlx(flatten)]
    pub permissions: Permissions,
    pub account_status: AccountStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub token_version: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub last_password_change: Option<DateTime<Utc>>,
    pub avatar: Option<String>,
    pub totp_secret: Option<String>,
    pub totp_enabled: bool,
    pub backup_codes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Emails are stored lowercased so uniqueness is case-insensitive.
    pub fn new(name: String, email: String, password_hash: String, first_user: bool) -> Self {
        let now = Utc::now();
        let (role, permissions, account_status) = if first_user {
            (Role::Admin, Permissions::all(), AccountStatus::Approved)
        } else {
            (Role::Viewer, Permissions::none(), AccountStatus::Pending)
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.to_lowercase(),
            password_hash,
            role,
            permissions,
            account_status,
            approved_by: None,
            approved_at: None,
            rejected_reason: None,
            token_version: 0,
            last_login: None,
            last_password_change: None,
            avatar: None,
            totp_secret: None,
            totp_enabled: false,
            backup_codes: "[]".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
