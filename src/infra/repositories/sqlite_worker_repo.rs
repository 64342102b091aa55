use crate::domain::models::worker::Worker;
use crate::domain::ports::{Page, WorkerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

pub struct SqliteWorkerRepo {
    pool: SqlitePool,
}

impl SqliteWorkerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: Option<&str>) -> &'static str {
        match sort {
            Some("name") => "name",
            Some("phone") => "phone",
            Some("joiningDate") => "joining_date",
            _ => "created_at",
        }
    }
}

#[async_trait]
impl WorkerRepository for SqliteWorkerRepo {
    async fn create(&self, worker: &Worker) -> Result<Worker, AppError> {
        sqlx::query_as::<_, Worker>(
            "INSERT INTO workers (id, name, phone, address, joining_date, national_id, photo, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&worker.id)
        .bind(&worker.name)
        .bind(&worker.phone)
        .bind(&worker.address)
        .bind(worker.joining_date)
        .bind(&worker.national_id)
        .bind(&worker.photo)
        .bind(worker.created_at)
        .bind(worker.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Worker>, AppError> {
        sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Worker>, AppError> {
        sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE phone = ?")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, search: Option<&str>) -> Result<(Vec<Worker>, i64), AppError> {
        let pattern = search.map(|s| format!("%{}%", s));
        let order_by = format!("{} {}", Self::sort_column(page.sort.as_deref()), page.order.as_sql());

        let (rows, total) = match &pattern {
            Some(p) => {
                let rows = sqlx::query_as::<_, Worker>(&format!(
                    "SELECT * FROM workers WHERE name LIKE ? OR phone LIKE ? ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(p)
                .bind(p)
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM workers WHERE name LIKE ? OR phone LIKE ?",
                )
                .bind(p)
                .bind(p)
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, Worker>(&format!(
                    "SELECT * FROM workers ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workers")
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
        };

        Ok((rows, total))
    }

    async fn update(&self, worker: &Worker) -> Result<Worker, AppError> {
        sqlx::query_as::<_, Worker>(
            "UPDATE workers SET name = ?, phone = ?, address = ?, joining_date = ?, \
             national_id = ?, photo = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(&worker.name)
        .bind(&worker.phone)
        .bind(&worker.address)
        .bind(worker.joining_date)
        .bind(&worker.national_id)
        .bind(&worker.photo)
        .bind(Utc::now())
        .bind(&worker.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Worker not found".into()))
    }

    async fn delete_cascade(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workers WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Worker not found".into()));
        }

        // Children first, so no observer ever sees an installment pointing at
        // a deleted loan. The transaction makes the whole cascade atomic.
        let installments = sqlx::query(
            "DELETE FROM installments WHERE loan_id IN (SELECT id FROM loans WHERE worker_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let loans = sqlx::query("DELETE FROM loans WHERE worker_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            worker_id = id,
            loans = loans.rows_affected(),
            installments = installments.rows_affected(),
            "Worker deleted with cascade"
        );

        Ok(())
    }
}
