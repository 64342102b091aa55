use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::user::{AccountStatus, Permissions, Role};
use crate::domain::ports::{Page, SortOrder};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub totp_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorVerifyRequest {
    pub code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorDisableRequest {
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserRequest {
    pub role: Option<Role>,
    pub permissions: Option<Permissions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectUserRequest {
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionsRequest {
    pub role: Option<Role>,
    pub permissions: Permissions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub status: Option<AccountStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerRequest {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub joining_date: NaiveDate,
    pub national_id: Option<String>,
    pub photo: Option<String>,
}

/// Update payloads merge into the stored row: an omitted (or null) field
/// keeps its current value, so a field can never be cleared back to null.
/// The same rule applies to every Update*Request below.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub photo: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub worker_id: String,
    pub amount: f64,
    pub loan_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoanRequest {
    pub amount: Option<f64>,
    pub loan_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallmentRequest {
    pub loan_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstallmentRequest {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBaanaRequest {
    pub date: NaiveDate,
    pub count: f64,
    pub quality: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBaanaRequest {
    pub date: Option<NaiveDate>,
    pub count: Option<f64>,
    pub quality: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeamRequest {
    pub date: NaiveDate,
    pub count: f64,
    pub loom_no: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBeamRequest {
    pub date: Option<NaiveDate>,
    pub count: Option<f64>,
    pub loom_no: Option<String>,
    pub notes: Option<String>,
}

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Shared list-query shape. Filters that do not apply to a resource are
/// simply ignored by its handler.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
    pub worker_id: Option<String>,
    pub loan_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ListQuery {
    pub fn page_params(&self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let order = match self.order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Page {
            page,
            page_size,
            sort: self.sort.clone(),
            order,
        }
    }
}
