use crate::domain::models::production::Expense;
use crate::domain::ports::{ExpenseRepository, Page};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteExpenseRepo {
    pool: SqlitePool,
}

impl SqliteExpenseRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: Option<&str>) -> &'static str {
        match sort {
            Some("date") => "date",
            Some("amount") => "amount",
            Some("category") => "category",
            _ => "created_at",
        }
    }
}

// Dates are stored as ISO text, so open-ended bounds must keep four-digit
// years for the string comparison to hold.
fn date_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    (
        from.unwrap_or_else(|| NaiveDate::from_ymd_opt(1, 1, 1).expect("valid date")),
        to.unwrap_or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31).expect("valid date")),
    )
}

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepo {
    async fn create(&self, expense: &Expense) -> Result<Expense, AppError> {
        sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (id, date, amount, category, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&expense.id)
        .bind(expense.date)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.notes)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>, AppError> {
        sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Expense>, i64), AppError> {
        let order_by = format!("{} {}", Self::sort_column(page.sort.as_deref()), page.order.as_sql());

        let (from, to) = date_bounds(from, to);

        let rows = sqlx::query_as::<_, Expense>(&format!(
            "SELECT * FROM expenses WHERE date >= ? AND date <= ? ORDER BY {order_by} LIMIT ? OFFSET ?"
        ))
        .bind(from)
        .bind(to)
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM expenses WHERE date >= ? AND date <= ?",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, AppError> {
        sqlx::query_as::<_, Expense>(
            "UPDATE expenses SET date = ?, amount = ?, category = ?, notes = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(expense.date)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.notes)
        .bind(Utc::now())
        .bind(&expense.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Expense not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense not found".into()));
        }
        Ok(())
    }
}
