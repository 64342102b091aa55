use crate::domain::models::production::{Baana, Beam};
use crate::domain::ports::{BaanaRepository, BeamRepository, Page};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("date") => "date",
        Some("count") => "count",
        _ => "created_at",
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

pub struct SqliteBaanaRepo {
    pool: SqlitePool,
}

impl SqliteBaanaRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaanaRepository for SqliteBaanaRepo {
    async fn create(&self, record: &Baana) -> Result<Baana, AppError> {
        sqlx::query_as::<_, Baana>(
            "INSERT INTO baana (id, date, count, quality, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&record.id)
        .bind(record.date)
        .bind(record.count)
        .bind(&record.quality)
        .bind(&record.notes)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Baana>, AppError> {
        sqlx::query_as::<_, Baana>("SELECT * FROM baana WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Baana>, i64), AppError> {
        let order_by = format!("{} {}", sort_column(page.sort.as_deref()), page.order.as_sql());
        let (from, to) = date_bounds(from, to);

        let rows = sqlx::query_as::<_, Baana>(&format!(
            "SELECT * FROM baana WHERE date >= ? AND date <= ? ORDER BY {order_by} LIMIT ? OFFSET ?"
        ))
        .bind(from)
        .bind(to)
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM baana WHERE date >= ? AND date <= ?")
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn update(&self, record: &Baana) -> Result<Baana, AppError> {
        sqlx::query_as::<_, Baana>(
            "UPDATE baana SET date = ?, count = ?, quality = ?, notes = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(record.date)
        .bind(record.count)
        .bind(&record.quality)
        .bind(&record.notes)
        .bind(Utc::now())
        .bind(&record.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Baana record not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM baana WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Baana record not found".into()));
        }
        Ok(())
    }
}

pub struct SqliteBeamRepo {
    pool: SqlitePool,
}

impl SqliteBeamRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeamRepository for SqliteBeamRepo {
    async fn create(&self, record: &Beam) -> Result<Beam, AppError> {
        sqlx::query_as::<_, Beam>(
            "INSERT INTO beam (id, date, count, loom_no, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&record.id)
        .bind(record.date)
        .bind(record.count)
        .bind(&record.loom_no)
        .bind(&record.notes)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Beam>, AppError> {
        sqlx::query_as::<_, Beam>("SELECT * FROM beam WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, page: &Page, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(Vec<Beam>, i64), AppError> {
        let order_by = format!("{} {}", sort_column(page.sort.as_deref()), page.order.as_sql());
        let (from, to) = date_bounds(from, to);

        let rows = sqlx::query_as::<_, Beam>(&format!(
            "SELECT * FROM beam WHERE date >= ? AND date <= ? ORDER BY {order_by} LIMIT ? OFFSET ?"
        ))
        .bind(from)
        .bind(to)
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM beam WHERE date >= ? AND date <= ?")
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn update(&self, record: &Beam) -> Result<Beam, AppError> {
        sqlx::query_as::<_, Beam>(
            "UPDATE beam SET date = ?, count = ?, loom_no = ?, notes = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(record.date)
        .bind(record.count)
        .bind(&record.loom_no)
        .bind(&record.notes)
        .bind(Utc::now())
        .bind(&record.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Beam record not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM beam WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Beam record not found".into()));
        }
        Ok(())
    }
}
