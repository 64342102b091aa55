use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// `remaining` is never stored. Every read computes it from the loan amount
/// minus the sum of its installments, clamped at zero, so the stored and
/// derived state cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub worker_id: String,
    pub amount: f64,
    pub loan_date: NaiveDate,
    pub notes: Option<String>,
    pub remaining: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(worker_id: String, amount: f64, loan_date: NaiveDate, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            worker_id,
            amount,
            loan_date,
            notes,
            remaining: amount,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub loan_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Installment {
    pub fn new(
        loan_id: String,
        date: NaiveDate,
        amount: f64,
        method: Option<String>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            loan_id,
            date,
            amount,
            method,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}
