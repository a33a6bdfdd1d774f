//! Error types for Stockroom server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes carried in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchItem = 5,
    NoSuchRequest = 6,
    InsufficientStock = 7,
    RequestAlreadyProcessed = 8,
    Duplicate = 9,
    BadValue = 10,
    ItemHasActiveRequests = 11,
    CategoryInUse = 12,
    NoSuchCategory = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                let code = if msg.starts_with("User") {
                    ErrorCode::NoSuchUser
                } else if msg.starts_with("Request") {
                    ErrorCode::NoSuchRequest
                } else if msg.starts_with("Category") {
                    ErrorCode::NoSuchCategory
                } else {
                    ErrorCode::NoSuchItem
                };
                (StatusCode::NOT_FOUND, code, msg.clone())
            }
            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, ErrorCode::RequestAlreadyProcessed, msg.clone())
            }
            AppError::InsufficientStock(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InsufficientStock, msg.clone())
            }
            AppError::Conflict(msg) => {
                let code = if msg.starts_with("Item") {
                    ErrorCode::ItemHasActiveRequests
                } else if msg.starts_with("Category") {
                    ErrorCode::CategoryInUse
                } else {
                    ErrorCode::Duplicate
                };
                (StatusCode::CONFLICT, code, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
