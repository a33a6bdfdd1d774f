//! Item (inventory) endpoints

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
    models::item::{
        BatchCreateItems, BatchDeleteItems, BatchUpdateItems, CreateItem, ItemDetails, ItemQuery,
        UpdateItem,
    },
};

use super::AuthenticatedUser;

/// Batch creation outcome
#[derive(Serialize, ToSchema)]
pub struct BatchCreateResponse {
    /// Number of items created
    pub added_count: i64,
    /// Number of entries submitted
    pub total_items: usize,
    /// Per-entry error messages for skipped entries
    pub errors: Vec<String>,
}

/// Batch update outcome
#[derive(Serialize, ToSchema)]
pub struct BatchUpdateResponse {
    /// Number of items updated
    pub updated_count: i64,
}

/// Batch delete outcome
#[derive(Serialize, ToSchema)]
pub struct BatchDeleteResponse {
    /// Number of items deleted
    pub deleted_count: i64,
}

/// List items with keyword, category and stock-status filters
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    params(ItemQuery),
    responses(
        (status = 200, description = "List of items", body = Vec<ItemDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.inventory.list_items(&query).await?;
    Ok(Json(items))
}

/// Get a single item
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(Json(item))
}

/// Create an item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemDetails),
        (status = 400, description = "Invalid stock counts or empty name"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDetails>)> {
    claims.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let item = state.services.inventory.create_item(&request).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemDetails),
        (status = 400, description = "Invalid stock counts"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateItem>,
) -> AppResult<Json<ItemDetails>> {
    claims.require_admin()?;

    let item = state.services.inventory.update_item(id, &changes).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item still has unreturned requests")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.inventory.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create several items at once
#[utoipa::path(
    post,
    path = "/items/batch",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = BatchCreateItems,
    responses(
        (status = 200, description = "Batch outcome", body = BatchCreateResponse),
        (status = 400, description = "Empty batch"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn batch_create_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BatchCreateItems>,
) -> AppResult<Json<BatchCreateResponse>> {
    claims.require_admin()?;

    if request.items.is_empty() {
        return Err(AppError::InvalidArgument("No items provided".to_string()));
    }

    let total_items = request.items.len();
    let (added_count, errors) = state
        .services
        .inventory
        .batch_create_items(&request.items)
        .await?;

    Ok(Json(BatchCreateResponse {
        added_count,
        total_items,
        errors,
    }))
}

/// Update several items at once; missing ids are skipped
#[utoipa::path(
    post,
    path = "/items/batch-update",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = BatchUpdateItems,
    responses(
        (status = 200, description = "Batch outcome", body = BatchUpdateResponse),
        (status = 400, description = "Empty batch"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn batch_update_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BatchUpdateItems>,
) -> AppResult<Json<BatchUpdateResponse>> {
    claims.require_admin()?;

    if request.items.is_empty() {
        return Err(AppError::InvalidArgument("No items provided".to_string()));
    }

    let updated_count = state
        .services
        .inventory
        .batch_update_items(&request.items)
        .await?;

    Ok(Json(BatchUpdateResponse { updated_count }))
}

/// Delete several items at once. Refused if any listed item still has
/// unreturned requests.
#[utoipa::path(
    post,
    path = "/items/batch-delete",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = BatchDeleteItems,
    responses(
        (status = 200, description = "Batch outcome", body = BatchDeleteResponse),
        (status = 400, description = "Empty batch"),
        (status = 409, description = "An item still has unreturned requests")
    )
)]
pub async fn batch_delete_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BatchDeleteItems>,
) -> AppResult<Json<BatchDeleteResponse>> {
    claims.require_admin()?;

    if request.ids.is_empty() {
        return Err(AppError::InvalidArgument("No item ids provided".to_string()));
    }

    let deleted_count = state
        .services
        .inventory
        .batch_delete_items(&request.ids)
        .await?;

    Ok(Json(BatchDeleteResponse { deleted_count }))
}
