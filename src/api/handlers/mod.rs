pub mod admin;
pub mod auth;
pub mod expense;
pub mod health;
pub mod installment;
pub mod loan;
pub mod production;
pub mod two_factor;
pub mod worker;
