pub mod config;
pub mod database;
pub mod money;
pub mod pagination;
pub mod password;
pub mod payment;
pub mod validation;
