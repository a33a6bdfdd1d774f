//! Borrow request model and related types.
//!
//! `quantity_requested` is immutable once submitted; `quantity_outstanding`
//! tracks what is still on loan and shrinks as returns are recorded. The
//! returned quantity is the difference between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::RequestStatus;

/// Borrow request model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRequest {
    pub id: i32,
    pub username: String,
    pub item_id: i32,
    /// Item name snapshot taken at submission time
    pub item_name: String,
    /// Item category snapshot taken at submission time
    pub item_category: String,
    pub quantity_requested: i32,
    pub quantity_outstanding: i32,
    pub purpose: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approver: Option<String>,
    pub comment: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl BorrowRequest {
    /// Units returned so far
    pub fn returned_quantity(&self) -> i32 {
        self.quantity_requested - self.quantity_outstanding
    }
}

/// Borrow request with derived fields for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub username: String,
    pub item_id: i32,
    pub item_name: String,
    pub item_category: String,
    pub quantity_requested: i32,
    pub quantity_outstanding: i32,
    pub returned_quantity: i32,
    pub purpose: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approver: Option<String>,
    pub comment: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<BorrowRequest> for RequestDetails {
    fn from(req: BorrowRequest) -> Self {
        let returned_quantity = req.returned_quantity();
        Self {
            id: req.id,
            username: req.username,
            item_id: req.item_id,
            item_name: req.item_name,
            item_category: req.item_category,
            quantity_requested: req.quantity_requested,
            quantity_outstanding: req.quantity_outstanding,
            returned_quantity,
            purpose: req.purpose,
            status: req.status,
            created_at: req.created_at,
            approved_at: req.approved_at,
            approver: req.approver,
            comment: req.comment,
            returned_at: req.returned_at,
        }
    }
}

/// Submit request payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    pub item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    #[validate(length(min = 1, message = "Purpose must not be empty"))]
    pub purpose: String,
}

/// Approve/reject decision payload
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct Decision {
    pub comment: Option<String>,
}

/// Return payload; quantity defaults to the full outstanding amount
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub quantity: Option<i32>,
}

/// Request query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    pub username: Option<String>,
    pub status: Option<RequestStatus>,
}

/// Batch decision action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Approve,
    Reject,
}

/// Batch approve/reject payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchProcessRequests {
    pub ids: Vec<i32>,
    pub action: BatchAction,
    pub comment: Option<String>,
}
