pub mod actions;
pub mod files;
pub mod health;
pub mod portfolio;
pub mod transactions;
