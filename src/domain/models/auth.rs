use serde::{Deserialize, Serialize};

use crate::domain::models::user::{Permissions, Role};

/// Access token payload. Carries a snapshot of role, permissions and
/// token_version taken at issue time; handlers trust this snapshot until
/// the token expires (the bounded-staleness window of stateless access
/// tokens). Only the refresh flow compares token_version against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub sub: String,
    pub role: Role,
    pub permissions: Permissions,
    pub token_version: i64,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub sub: String,
    pub token_version: i64,
    pub iat: usize,
    pub exp: usize,
}
