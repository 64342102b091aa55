use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(date: NaiveDate, amount: f64, category: String, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            amount,
            category,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Baana (weft yarn) arrival record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Baana {
    pub id: String,
    pub date: NaiveDate,
    pub count: f64,
    pub quality: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Baana {
    pub fn new(date: NaiveDate, count: f64, quality: Option<String>, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            count,
            quality,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Beam (warp) arrival record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Beam {
    pub id: String,
    pub date: NaiveDate,
    pub count: f64,
    pub loom_no: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Beam {
    pub fn new(date: NaiveDate, count: f64, loom_no: Option<String>, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            count,
            loom_no,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}
