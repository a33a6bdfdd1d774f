//! Statistics and export endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

use super::AuthenticatedUser;

/// System overview response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of distinct items
    pub total_items: i64,
    /// Total units owned across all items
    pub total_stock: i64,
    /// Units currently in stock
    pub current_stock: i64,
    /// Units currently on loan
    pub on_loan: i64,
    /// Request counts by status
    pub request_stats: RequestStats,
    /// Submissions per day over the last 7 days, newest first
    pub weekly_trend: Vec<TrendEntry>,
    /// Item counts per category
    pub category_stats: Vec<StatEntry>,
}

/// Request counts by lifecycle status
#[derive(Default, Serialize, ToSchema)]
pub struct RequestStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub returned: i64,
    pub partially_returned: i64,
}

/// One day of the submission trend
#[derive(Serialize, ToSchema)]
pub struct TrendEntry {
    /// Day (YYYY-MM-DD)
    pub date: String,
    /// Requests submitted that day
    pub count: i64,
}

/// Generic label/value pair
#[derive(Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

/// Item quantity statistics
#[derive(Serialize, ToSchema)]
pub struct ItemStatsResponse {
    /// Number of distinct items
    pub total_items: i64,
    /// Total units owned
    pub total_quantity: i64,
    /// Units in stock
    pub available_quantity: i64,
    /// Units on loan
    pub borrowed_quantity: i64,
    /// Per-category breakdown
    pub category_stats: Vec<CategoryStatEntry>,
}

/// Per-category stock statistics
#[derive(Serialize, ToSchema)]
pub struct CategoryStatEntry {
    pub category: String,
    pub item_count: i64,
    pub total_quantity: i64,
    pub available_quantity: i64,
    pub borrowed_quantity: i64,
}

/// Export scope
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    #[default]
    All,
    Items,
    Requests,
    Categories,
}

/// Export query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ExportQuery {
    /// What to export (default: all)
    #[serde(rename = "type", default)]
    pub export_type: Option<ExportType>,
}

/// Get system overview statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "System statistics", body = StatsResponse),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    claims.require_admin()?;

    let stats = state.services.stats.overview().await?;
    Ok(Json(stats))
}

/// Get item quantity statistics with per-category breakdown
#[utoipa::path(
    get,
    path = "/stats/items",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item statistics", body = ItemStatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_item_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ItemStatsResponse>> {
    let stats = state.services.stats.item_stats().await?;
    Ok(Json(stats))
}

/// Export system data as a JSON document
#[utoipa::path(
    get,
    path = "/export",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ExportQuery),
    responses(
        (status = 200, description = "Exported data"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn export_data(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<Json<serde_json::Value>> {
    claims.require_admin()?;

    let data = state
        .services
        .stats
        .export(query.export_type.unwrap_or_default())
        .await?;

    Ok(Json(data))
}
