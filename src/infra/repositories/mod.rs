pub mod sqlite_expense_repo;
pub mod sqlite_installment_repo;
pub mod sqlite_loan_repo;
pub mod sqlite_production_repo;
pub mod sqlite_user_repo;
pub mod sqlite_worker_repo;
