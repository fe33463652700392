//! Bugtrack Server - REST API for the bug tracker
//!
//! This crate provides the HTTP layer and record store for bug records:
//! CRUD endpoints, filtered listing with pagination, and statistics.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod store;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::{create_router, App};
