pub mod auth;
pub mod loan;
pub mod production;
pub mod user;
pub mod worker;
