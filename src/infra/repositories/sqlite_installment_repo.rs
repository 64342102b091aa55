use crate::domain::models::loan::Installment;
use crate::domain::ports::{InstallmentRepository, Page};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteInstallmentRepo {
    pool: SqlitePool,
}

impl SqliteInstallmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: Option<&str>) -> &'static str {
        match sort {
            Some("date") => "date",
            Some("amount") => "amount",
            _ => "created_at",
        }
    }
}

#[async_trait]
impl InstallmentRepository for SqliteInstallmentRepo {
    async fn create(&self, installment: &Installment) -> Result<Installment, AppError> {
        sqlx::query_as::<_, Installment>(
            "INSERT INTO installments (id, loan_id, date, amount, method, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&installment.id)
        .bind(&installment.loan_id)
        .bind(installment.date)
        .bind(installment.amount)
        .bind(&installment.method)
        .bind(&installment.notes)
        .bind(installment.created_at)
        .bind(installment.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Installment>, AppError> {
        sqlx::query_as::<_, Installment>("SELECT * FROM installments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, loan_id: Option<&str>) -> Result<(Vec<Installment>, i64), AppError> {
        let order_by = format!("{} {}", Self::sort_column(page.sort.as_deref()), page.order.as_sql());

        let (rows, total) = match loan_id {
            Some(loan_id) => {
                let rows = sqlx::query_as::<_, Installment>(&format!(
                    "SELECT * FROM installments WHERE loan_id = ? ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(loan_id)
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM installments WHERE loan_id = ?")
                    .bind(loan_id)
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, Installment>(&format!(
                    "SELECT * FROM installments ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM installments")
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
        };

        Ok((rows, total))
    }

    async fn update(&self, installment: &Installment) -> Result<Installment, AppError> {
        sqlx::query_as::<_, Installment>(
            "UPDATE installments SET date = ?, amount = ?, method = ?, notes = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(installment.date)
        .bind(installment.amount)
        .bind(&installment.method)
        .bind(&installment.notes)
        .bind(Utc::now())
        .bind(&installment.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Installment not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM installments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Installment not found".into()));
        }
        Ok(())
    }
}
