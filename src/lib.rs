//! Stockroom Warehouse Inventory Management System
//!
//! A REST JSON API server for tracking warehouse stock: categorized items
//! with stock counts, borrow requests with an approval workflow, and full or
//! partial returns reconciling stock.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
