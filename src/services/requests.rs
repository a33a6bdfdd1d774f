//! Borrow request service: submit, decide, return.
//!
//! Authorization is the HTTP layer's business; this service takes the
//! requester and approver identities as opaque strings.

use crate::{
    error::AppResult,
    models::request::{BatchAction, CreateRequest, RequestDetails, RequestQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a single request
    pub async fn get(&self, id: i32) -> AppResult<RequestDetails> {
        Ok(self.repository.requests.get_by_id(id).await?.into())
    }

    /// List requests with optional username/status filters
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let requests = self.repository.requests.list(query).await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    /// Submit a borrow request on behalf of a user
    pub async fn submit(&self, username: &str, request: &CreateRequest) -> AppResult<RequestDetails> {
        let created = self.repository.requests.create(username, request).await?;

        tracing::info!(
            request_id = created.id,
            username = %created.username,
            item = %created.item_name,
            quantity = created.quantity_requested,
            "Borrow request submitted"
        );

        Ok(created.into())
    }

    /// Approve a pending request, reserving its quantity from stock
    pub async fn approve(
        &self,
        id: i32,
        approver: &str,
        comment: Option<&str>,
    ) -> AppResult<RequestDetails> {
        let approved = self.repository.requests.approve(id, approver, comment).await?;

        tracing::info!(request_id = id, approver = %approver, "Request approved");

        Ok(approved.into())
    }

    /// Reject a pending request
    pub async fn reject(
        &self,
        id: i32,
        approver: &str,
        comment: Option<&str>,
    ) -> AppResult<RequestDetails> {
        let rejected = self.repository.requests.reject(id, approver, comment).await?;

        tracing::info!(request_id = id, approver = %approver, "Request rejected");

        Ok(rejected.into())
    }

    /// Record a return; `quantity` of `None` returns the full outstanding amount
    pub async fn return_partial(&self, id: i32, quantity: Option<i32>) -> AppResult<RequestDetails> {
        let returned = self.repository.requests.return_partial(id, quantity).await?;

        tracing::info!(
            request_id = id,
            status = %returned.status,
            outstanding = returned.quantity_outstanding,
            "Return recorded"
        );

        Ok(returned.into())
    }

    /// Apply an approve/reject decision to each request independently.
    ///
    /// Each id runs in its own transaction; the batch as a whole is not
    /// atomic. Ids that fail (already processed, insufficient stock, missing)
    /// are skipped and excluded from the returned count.
    pub async fn batch_process(
        &self,
        ids: &[i32],
        action: BatchAction,
        approver: &str,
        comment: Option<&str>,
    ) -> AppResult<i64> {
        let mut processed = 0;

        for &id in ids {
            let result = match action {
                BatchAction::Approve => self.repository.requests.approve(id, approver, comment).await,
                BatchAction::Reject => self.repository.requests.reject(id, approver, comment).await,
            };

            match result {
                Ok(_) => processed += 1,
                // Domain failures are expected in a batch and skipped;
                // storage failures still abort the whole call.
                Err(e @ crate::error::AppError::Database(_)) => return Err(e),
                Err(e) => {
                    tracing::debug!(request_id = id, error = %e, "Skipped in batch processing");
                }
            }
        }

        Ok(processed)
    }
}
