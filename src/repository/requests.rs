//! Borrow requests repository: the stock reservation lifecycle.
//!
//! Every mutating operation runs as a single transaction. `approve` and
//! `return_partial` lock the item row with `SELECT ... FOR UPDATE` before the
//! authoritative stock check, so two concurrent approvals cannot jointly
//! overdraw the same stock. A failed check returns early and the dropped
//! transaction rolls back in full.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RequestStatus,
        item::Item,
        request::{BorrowRequest, CreateRequest, RequestQuery},
    },
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRequest> {
        sqlx::query_as::<_, BorrowRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// List requests, newest first, optionally filtered by username and status
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<BorrowRequest>> {
        let requests = sqlx::query_as::<_, BorrowRequest>(
            r#"
            SELECT * FROM requests
            WHERE ($1::text IS NULL OR username = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.username.as_deref())
        .bind(query.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Submit a new borrow request.
    ///
    /// The stock check here is advisory: nothing is reserved until approval,
    /// so two submissions may both pass against the same stock and get
    /// reconciled when an approver processes them.
    pub async fn create(&self, username: &str, request: &CreateRequest) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(request.item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", request.item_id)))?;

        if item.in_stock < request.quantity {
            return Err(AppError::InsufficientStock(format!(
                "Only {} of '{}' in stock, {} requested",
                item.in_stock, item.name, request.quantity
            )));
        }

        let created = sqlx::query_as::<_, BorrowRequest>(
            r#"
            INSERT INTO requests (
                username, item_id, item_name, item_category,
                quantity_requested, quantity_outstanding, purpose, status
            )
            VALUES ($1, $2, $3, $4, $5, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(request.quantity)
        .bind(&request.purpose)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Approve a pending request, reserving stock.
    ///
    /// Re-validates stock under the item row lock; submit's earlier check
    /// carries no authority here.
    pub async fn approve(&self, id: i32, approver: &str, comment: Option<&str>) -> AppResult<BorrowRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, BorrowRequest>(
            "SELECT * FROM requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))?;

        if !request.status.is_pending() {
            return Err(AppError::InvalidState(format!(
                "Request {} has already been processed ({})",
                id, request.status
            )));
        }

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(request.item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Item with id {} not found", request.item_id))
            })?;

        // Authoritative stock check
        if item.in_stock < request.quantity_outstanding {
            return Err(AppError::InsufficientStock(format!(
                "Only {} of '{}' in stock, {} requested",
                item.in_stock, item.name, request.quantity_outstanding
            )));
        }

        sqlx::query("UPDATE items SET in_stock = in_stock - $1, updated_at = $2 WHERE id = $3")
            .bind(request.quantity_outstanding)
            .bind(now)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;

        let approved = sqlx::query_as::<_, BorrowRequest>(
            r#"
            UPDATE requests
            SET status = 'approved', approved_at = $1, approver = $2, comment = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(approver)
        .bind(comment)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(approved)
    }

    /// Reject a pending request. No stock was reserved, so none moves.
    pub async fn reject(&self, id: i32, approver: &str, comment: Option<&str>) -> AppResult<BorrowRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, BorrowRequest>(
            "SELECT * FROM requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))?;

        if !request.status.is_pending() {
            return Err(AppError::InvalidState(format!(
                "Request {} has already been processed ({})",
                id, request.status
            )));
        }

        let rejected = sqlx::query_as::<_, BorrowRequest>(
            r#"
            UPDATE requests
            SET status = 'rejected', approved_at = $1, approver = $2, comment = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(approver)
        .bind(comment)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rejected)
    }

    /// Record a full or partial return against an approved request.
    ///
    /// `quantity` of `None` returns everything still outstanding. The request
    /// stays `partially_returned` until the outstanding quantity reaches
    /// zero, then becomes `returned`.
    pub async fn return_partial(&self, id: i32, quantity: Option<i32>) -> AppResult<BorrowRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, BorrowRequest>(
            "SELECT * FROM requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))?;

        if !request.status.is_outstanding() {
            return Err(AppError::InvalidState(format!(
                "Request {} is not on loan ({})",
                id, request.status
            )));
        }

        let return_quantity = quantity.unwrap_or(request.quantity_outstanding);

        if return_quantity <= 0 {
            return Err(AppError::InvalidArgument(
                "Return quantity must be positive".to_string(),
            ));
        }
        if return_quantity > request.quantity_outstanding {
            return Err(AppError::InvalidArgument(format!(
                "Return quantity {} exceeds outstanding quantity {}",
                return_quantity, request.quantity_outstanding
            )));
        }

        // Lock the item row before moving stock back
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(request.item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Item with id {} not found", request.item_id))
            })?;

        sqlx::query("UPDATE items SET in_stock = in_stock + $1, updated_at = $2 WHERE id = $3")
            .bind(return_quantity)
            .bind(now)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;

        let remaining = request.quantity_outstanding - return_quantity;
        let new_status = if remaining == 0 {
            RequestStatus::Returned
        } else {
            RequestStatus::PartiallyReturned
        };

        let returned = sqlx::query_as::<_, BorrowRequest>(
            r#"
            UPDATE requests
            SET quantity_outstanding = $1, status = $2, returned_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(remaining)
        .bind(new_status)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(returned)
    }

    /// Count requests holding stock of an item (approved or partially returned)
    pub async fn count_active_for_item(&self, item_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests WHERE item_id = $1 AND status IN ('approved', 'partially_returned')",
        )
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count requests per status
    pub async fn count_by_status(&self) -> AppResult<Vec<(String, i64)>> {
        let rows = sqlx::query("SELECT status, COUNT(*) as count FROM requests GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get::<String, _>("status"), r.get::<i64, _>("count")))
            .collect())
    }

    /// Submissions per day over the last `days` days, oldest first
    pub async fn daily_submissions(&self, days: i32) -> AppResult<Vec<(String, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT TO_CHAR(created_at::date, 'YYYY-MM-DD') as day, COUNT(*) as count
            FROM requests
            WHERE created_at >= NOW() - make_interval(days => $1)
            GROUP BY created_at::date
            ORDER BY created_at::date
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get::<String, _>("day"), r.get::<i64, _>("count")))
            .collect())
    }

    /// All requests, for data export
    pub async fn list_all(&self) -> AppResult<Vec<BorrowRequest>> {
        let requests =
            sqlx::query_as::<_, BorrowRequest>("SELECT * FROM requests ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(requests)
    }
}
