pub mod password;
pub mod token_service;
pub mod two_factor;
