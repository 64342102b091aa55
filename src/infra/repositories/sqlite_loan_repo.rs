use crate::domain::models::loan::Loan;
use crate::domain::ports::{LoanRepository, Page};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

// Remaining balance is derived on every read and clamped at zero so an
// overpaid loan never reports a negative balance.
const LOAN_SELECT: &str = "SELECT l.id, l.worker_id, l.amount, l.loan_date, l.notes, l.created_at, l.updated_at, \
     MAX(l.amount - COALESCE((SELECT SUM(i.amount) FROM installments i WHERE i.loan_id = l.id), 0.0), 0.0) AS remaining \
     FROM loans l";

pub struct SqliteLoanRepo {
    pool: SqlitePool,
}

impl SqliteLoanRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: Option<&str>) -> &'static str {
        match sort {
            Some("amount") => "l.amount",
            Some("loanDate") => "l.loan_date",
            _ => "l.created_at",
        }
    }
}

#[async_trait]
impl LoanRepository for SqliteLoanRepo {
    async fn create(&self, loan: &Loan) -> Result<Loan, AppError> {
        sqlx::query(
            "INSERT INTO loans (id, worker_id, amount, loan_date, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&loan.id)
        .bind(&loan.worker_id)
        .bind(loan.amount)
        .bind(loan.loan_date)
        .bind(&loan.notes)
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&loan.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>, AppError> {
        sqlx::query_as::<_, Loan>(&format!("{LOAN_SELECT} WHERE l.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, worker_id: Option<&str>) -> Result<(Vec<Loan>, i64), AppError> {
        let order_by = format!("{} {}", Self::sort_column(page.sort.as_deref()), page.order.as_sql());

        let (rows, total) = match worker_id {
            Some(worker_id) => {
                let rows = sqlx::query_as::<_, Loan>(&format!(
                    "{LOAN_SELECT} WHERE l.worker_id = ? ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(worker_id)
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM loans WHERE worker_id = ?")
                    .bind(worker_id)
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, Loan>(&format!(
                    "{LOAN_SELECT} ORDER BY {order_by} LIMIT ? OFFSET ?"
                ))
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM loans")
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
        };

        Ok((rows, total))
    }

    async fn update(&self, loan: &Loan) -> Result<Loan, AppError> {
        let result = sqlx::query(
            "UPDATE loans SET amount = ?, loan_date = ?, notes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(loan.amount)
        .bind(loan.loan_date)
        .bind(&loan.notes)
        .bind(Utc::now())
        .bind(&loan.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Loan not found".into()));
        }

        self.find_by_id(&loan.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".into()))
    }

    async fn delete_cascade(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM loans WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Loan not found".into()));
        }

        let installments = sqlx::query("DELETE FROM installments WHERE loan_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM loans WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            loan_id = id,
            installments = installments.rows_affected(),
            "Loan deleted with cascade"
        );

        Ok(())
    }
}
