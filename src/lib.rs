pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod files;
pub mod pagination;
pub mod query;
pub mod services;
