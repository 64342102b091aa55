use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::token_service::TokenService;
use crate::infra::repositories::{
    sqlite_expense_repo::SqliteExpenseRepo,
    sqlite_installment_repo::SqliteInstallmentRepo,
    sqlite_loan_repo::SqliteLoanRepo,
    sqlite_production_repo::{SqliteBaanaRepo, SqliteBeamRepo},
    sqlite_user_repo::SqliteUserRepo,
    sqlite_worker_repo::SqliteWorkerRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    AppState {
        config: config.clone(),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        worker_repo: Arc::new(SqliteWorkerRepo::new(pool.clone())),
        loan_repo: Arc::new(SqliteLoanRepo::new(pool.clone())),
        installment_repo: Arc::new(SqliteInstallmentRepo::new(pool.clone())),
        expense_repo: Arc::new(SqliteExpenseRepo::new(pool.clone())),
        baana_repo: Arc::new(SqliteBaanaRepo::new(pool.clone())),
        beam_repo: Arc::new(SqliteBeamRepo::new(pool)),
        token_service: Arc::new(TokenService::new(config)),
    }
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
