//! Category model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Category model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Category with the number of items referencing it
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CategoryWithCount {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub item_count: i64,
}

/// Create category payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

/// Update category payload
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}
