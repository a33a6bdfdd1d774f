//! Borrow request endpoints.
//!
//! Submitting and listing are open to any authenticated user; decisions,
//! returns and batch processing are admin operations. The requester identity
//! always comes from the token, never from the payload.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{
        BatchProcessRequests, CreateRequest, Decision, RequestDetails, RequestQuery, ReturnRequest,
    },
};

use super::AuthenticatedUser;

/// Batch processing outcome
#[derive(Serialize, ToSchema)]
pub struct BatchProcessResponse {
    /// Number of requests successfully processed; failed ids are skipped
    pub processed_count: i64,
}

/// List borrow requests
///
/// Non-admin callers only see their own requests regardless of the
/// `username` filter.
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "List of requests", body = Vec<RequestDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(mut query): Query<RequestQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    if !claims.is_admin() {
        query.username = Some(claims.sub.clone());
    }

    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// Get a single borrow request
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get(id).await?;

    if !claims.is_admin() && request.username != claims.sub {
        return Err(AppError::Authorization(
            "Cannot view another user's request".to_string(),
        ));
    }

    Ok(Json(request))
}

/// Submit a borrow request
///
/// Stock is checked but not reserved; reservation happens at approval.
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request submitted", body = RequestDetails),
        (status = 400, description = "Invalid quantity or empty purpose"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Insufficient stock")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    request
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let created = state
        .services
        .requests
        .submit(&claims.sub, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve a pending request, reserving stock
#[utoipa::path(
    post,
    path = "/requests/{id}/approve",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    request_body = Decision,
    responses(
        (status = 200, description = "Request approved", body = RequestDetails),
        (status = 404, description = "Request or item not found"),
        (status = 409, description = "Request already processed"),
        (status = 422, description = "Insufficient stock")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(decision): Json<Decision>,
) -> AppResult<Json<RequestDetails>> {
    claims.require_admin()?;

    let approved = state
        .services
        .requests
        .approve(id, &claims.sub, decision.comment.as_deref())
        .await?;

    Ok(Json(approved))
}

/// Reject a pending request
#[utoipa::path(
    post,
    path = "/requests/{id}/reject",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    request_body = Decision,
    responses(
        (status = 200, description = "Request rejected", body = RequestDetails),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already processed")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(decision): Json<Decision>,
) -> AppResult<Json<RequestDetails>> {
    claims.require_admin()?;

    let rejected = state
        .services
        .requests
        .reject(id, &claims.sub, decision.comment.as_deref())
        .await?;

    Ok(Json(rejected))
}

/// Record a return against an approved request
///
/// Omitting the quantity returns everything still outstanding.
#[utoipa::path(
    post,
    path = "/requests/{id}/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Return recorded", body = RequestDetails),
        (status = 400, description = "Return quantity exceeds outstanding quantity"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not on loan")
    )
)]
pub async fn return_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<RequestDetails>> {
    claims.require_admin()?;

    let returned = state
        .services
        .requests
        .return_partial(id, request.quantity)
        .await?;

    Ok(Json(returned))
}

/// Approve or reject several requests at once
///
/// Each id is processed independently; ids that fail their checks are
/// skipped and only the successful count is reported.
#[utoipa::path(
    post,
    path = "/requests/batch-process",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = BatchProcessRequests,
    responses(
        (status = 200, description = "Batch outcome", body = BatchProcessResponse),
        (status = 400, description = "Empty batch"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn batch_process_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BatchProcessRequests>,
) -> AppResult<Json<BatchProcessResponse>> {
    claims.require_admin()?;

    if request.ids.is_empty() {
        return Err(AppError::InvalidArgument("No request ids provided".to_string()));
    }

    let processed_count = state
        .services
        .requests
        .batch_process(
            &request.ids,
            request.action,
            &claims.sub,
            request.comment.as_deref(),
        )
        .await?;

    Ok(Json(BatchProcessResponse { processed_count }))
}
