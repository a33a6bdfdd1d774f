//! Category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory},
};

use super::AuthenticatedUser;

/// List categories with their item counts
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryWithCount>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    let categories = state.services.inventory.list_categories().await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 409, description = "Category already exists"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    claims.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let category = state.services.inventory.create_category(&request).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category; renaming moves its items along
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "New name already in use")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    claims.require_admin()?;

    let category = state
        .services
        .inventory
        .update_category(id, &changes)
        .await?;
    Ok(Json(category))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still referenced by items or is the default")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.inventory.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
