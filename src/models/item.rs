//! Item (inventory entry) model and related types.
//!
//! `total` and `in_stock` are the persisted counts; `on_loan` and the stock
//! status are derived from them and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::StockStatus;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub total: i32,
    pub in_stock: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Units currently on loan
    pub fn on_loan(&self) -> i32 {
        self.total - self.in_stock
    }

    /// Availability derived from the stock counts
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.in_stock, self.total)
    }
}

/// Item with derived fields for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDetails {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub total: i32,
    pub in_stock: i32,
    pub on_loan: i32,
    pub status: StockStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemDetails {
    fn from(item: Item) -> Self {
        let on_loan = item.on_loan();
        let status = item.stock_status();
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            total: item.total,
            in_stock: item.in_stock,
            on_loan,
            status,
            description: item.description,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Create item payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Item name must not be empty"))]
    pub name: String,
    /// Category name; the default category is used when omitted
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Total must not be negative"))]
    pub total: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "In-stock count must not be negative"))]
    pub in_stock: i32,
    pub description: Option<String>,
}

/// Update item payload; only provided fields are changed
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub total: Option<i32>,
    pub in_stock: Option<i32>,
    pub description: Option<String>,
}

/// Item query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Substring match on name or description
    pub keyword: Option<String>,
    /// Exact category name
    pub category: Option<String>,
    /// Filter by derived stock status
    pub status: Option<StockStatus>,
}

/// Batch create payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchCreateItems {
    pub items: Vec<CreateItem>,
}

/// Batch update payload: each entry carries its target id
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchUpdateItems {
    pub items: Vec<BatchUpdateEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchUpdateEntry {
    pub id: i32,
    #[serde(flatten)]
    pub changes: UpdateItem,
}

/// Batch delete payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchDeleteItems {
    pub ids: Vec<i32>,
}
