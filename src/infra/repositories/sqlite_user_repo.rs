use crate::domain::models::user::{AccountStatus, Permissions, Role, User};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLS: &str = "id, name, email, password_hash, role, can_read, can_write, can_delete, can_export, \
     account_status, approved_by, approved_at, rejected_reason, token_version, last_login, \
     last_password_change, avatar, totp_secret, totp_enabled, backup_codes, created_at, updated_at";

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, can_read, can_write, can_delete, can_export, \
             account_status, approved_by, approved_at, rejected_reason, token_version, last_login, \
             last_password_change, avatar, totp_secret, totp_enabled, backup_codes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {USER_COLS}"
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.permissions.can_read)
        .bind(user.permissions.can_write)
        .bind(user.permissions.can_delete)
        .bind(user.permissions.can_export)
        .bind(user.account_status)
        .bind(&user.approved_by)
        .bind(user.approved_at)
        .bind(&user.rejected_reason)
        .bind(user.token_version)
        .bind(user.last_login)
        .bind(user.last_password_change)
        .bind(&user.avatar)
        .bind(&user.totp_secret)
        .bind(user.totp_enabled)
        .bind(&user.backup_codes)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE email = ?"))
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<User>, AppError> {
        match status {
            Some(status) => sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLS} FROM users WHERE account_status = ? ORDER BY created_at ASC"
            ))
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database),
            None => sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLS} FROM users ORDER BY created_at ASC"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database),
        }
    }

    async fn update_profile(&self, id: &str, name: Option<&str>, avatar: Option<&str>) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = COALESCE(?, name), avatar = COALESCE(?, avatar), updated_at = ? \
             WHERE id = ? RETURNING {USER_COLS}"
        ))
        .bind(name)
        .bind(avatar)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn touch_last_login(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn set_password(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET password_hash = ?, last_password_change = ?, \
             token_version = token_version + 1, updated_at = ? WHERE id = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }

    async fn bump_token_version(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET token_version = token_version + 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn apply_approval(&self, id: &str, role: Role, permissions: Permissions, approver_id: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET account_status = 'approved', role = ?, \
             can_read = ?, can_write = ?, can_delete = ?, can_export = ?, \
             approved_by = ?, approved_at = ?, rejected_reason = NULL, \
             token_version = token_version + 1, updated_at = ? \
             WHERE id = ? RETURNING {USER_COLS}"
        ))
        .bind(role)
        .bind(permissions.can_read)
        .bind(permissions.can_write)
        .bind(permissions.can_delete)
        .bind(permissions.can_export)
        .bind(approver_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn apply_rejection(&self, id: &str, reason: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET account_status = 'rejected', rejected_reason = ?, \
             token_version = token_version + 1, updated_at = ? \
             WHERE id = ? RETURNING {USER_COLS}"
        ))
        .bind(reason)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn apply_grants(&self, id: &str, role: Role, permissions: Permissions) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = ?, can_read = ?, can_write = ?, can_delete = ?, can_export = ?, \
             token_version = token_version + 1, updated_at = ? \
             WHERE id = ? RETURNING {USER_COLS}"
        ))
        .bind(role)
        .bind(permissions.can_read)
        .bind(permissions.can_write)
        .bind(permissions.can_delete)
        .bind(permissions.can_export)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn set_two_factor(&self, id: &str, secret: Option<&str>, enabled: bool, backup_codes: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET totp_secret = ?, totp_enabled = ?, backup_codes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(secret)
        .bind(enabled)
        .bind(backup_codes)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
