use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    BaanaRepository, BeamRepository, ExpenseRepository, InstallmentRepository, LoanRepository,
    UserRepository, WorkerRepository,
};
use crate::domain::services::token_service::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub worker_repo: Arc<dyn WorkerRepository>,
    pub loan_repo: Arc<dyn LoanRepository>,
    pub installment_repo: Arc<dyn InstallmentRepository>,
    pub expense_repo: Arc<dyn ExpenseRepository>,
    pub baana_repo: Arc<dyn BaanaRepository>,
    pub beam_repo: Arc<dyn BeamRepository>,
    pub token_service: Arc<TokenService>,
}
