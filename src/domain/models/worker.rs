use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub joining_date: NaiveDate,
    pub national_id: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    pub fn new(
        name: String,
        phone: String,
        address: Option<String>,
        joining_date: NaiveDate,
        national_id: Option<String>,
        photo: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            address,
            joining_date,
            national_id,
            photo,
            created_at: now,
            updated_at: now,
        }
    }
}
