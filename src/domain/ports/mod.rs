use crate::domain::models::{
    loan::{Installment, Loan},
    production::{Baana, Beam, Expense},
    user::{AccountStatus, Permissions, Role, User},
    worker::Worker,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination/sort parameters shared by every list query. `sort` is a wire
/// name that each repository maps onto a whitelisted column.
#[derive(Debug, Clone)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
    pub sort: Option<String>,
    pub order: SortOrder,
}

impl Page {
    // page is client-supplied; saturate instead of trusting it to multiply
    // within range.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<User>, AppError>;
    async fn update_profile(&self, id: &str, name: Option<&str>, avatar: Option<&str>) -> Result<User, AppError>;
    async fn touch_last_login(&self, id: &str) -> Result<(), AppError>;
    /// Sets the new hash and bumps token_version in one statement so every
    /// outstanding refresh token dies with the old password.
    async fn set_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
    /// Atomic `token_version = token_version + 1`; never read-modify-write.
    async fn bump_token_version(&self, id: &str) -> Result<(), AppError>;
    async fn apply_approval(&self, id: &str, role: Role, permissions: Permissions, approver_id: &str) -> Result<User, AppError>;
    async fn apply_rejection(&self, id: &str, reason: &str) -> Result<User, AppError>;
    async fn apply_grants(&self, id: &str, role: Role, permissions: Permissions) -> Result<User, AppError>;
    async fn set_two_factor(&self, id: &str, secret: Option<&str>, enabled: bool, backup_codes: &str) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait WorkerRepository: Send + Sync {
    async fn create(&self, worker: &Worker) -> Result<Worker, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Worker>, AppError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Worker>, AppError>;
    async fn list(&self, page: &Page, search: Option<&str>) -> Result<(Vec<Worker>, i64), AppError>;
    async fn update(&self, worker: &Worker) -> Result<Worker, AppError>;
    /// Deletes the worker, its loans and their installments in one
    /// transaction. NotFound when the worker row is absent; no side effects
    /// in that case.
    async fn delete_cascade(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn create(&self, loan: &Loan) -> Result<Loan, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>, AppError>;
    async fn list(&self, page: &Page, worker_id: Option<&str>) -> Result<(Vec<Loan>, i64), AppError>;
    async fn update(&self, loan: &Loan) -> Result<Loan, AppError>;
    /// Deletes the loan and its installments in one transaction.
    async fn delete_cascade(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InstallmentRepository: Send + Sync {
    async fn create(&self, installment: &Installment) -> Result<Installment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Installment>, AppError>;
    async fn list(&self, page: &Page, loan_id: Option<&str>) -> Result<(Vec<Installment>, i64), AppError>;
    async fn update(&self, installment: &Installment) -> Result<Installment, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, expense: &Expense) -> Result<Expense, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>, AppError>;
    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Expense>, i64), AppError>;
    async fn update(&self, expense: &Expense) -> Result<Expense, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BaanaRepository: Send + Sync {
    async fn create(&self, record: &Baana) -> Result<Baana, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Baana>, AppError>;
    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Baana>, i64), AppError>;
    async fn update(&self, record: &Baana) -> Result<Baana, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BeamRepository: Send + Sync {
    async fn create(&self, record: &Beam) -> Result<Beam, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Beam>, AppError>;
    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Beam>, i64), AppError>;
    async fn update(&self, record: &Beam) -> Result<Beam, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
