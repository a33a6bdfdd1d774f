//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, categories, health, items, requests, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "1.0.0",
        description = "Warehouse Inventory Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::update_profile,
        auth::change_password,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::batch_create_items,
        items::batch_update_items,
        items::batch_delete_items,
        // Categories
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::approve_request,
        requests::reject_request,
        requests::return_request,
        requests::batch_process_requests,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Stats
        stats::get_stats,
        stats::get_item_stats,
        stats::export_data,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Items
            crate::models::item::ItemDetails,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::item::BatchCreateItems,
            crate::models::item::BatchUpdateItems,
            crate::models::item::BatchUpdateEntry,
            crate::models::item::BatchDeleteItems,
            items::BatchCreateResponse,
            items::BatchUpdateResponse,
            items::BatchDeleteResponse,
            // Categories
            crate::models::category::Category,
            crate::models::category::CategoryWithCount,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Requests
            crate::models::request::RequestDetails,
            crate::models::request::CreateRequest,
            crate::models::request::Decision,
            crate::models::request::ReturnRequest,
            crate::models::request::BatchAction,
            crate::models::request::BatchProcessRequests,
            requests::BatchProcessResponse,
            // Users
            crate::models::user::UserDetails,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::ChangePassword,
            // Enums
            crate::models::enums::RequestStatus,
            crate::models::enums::StockStatus,
            crate::models::enums::Role,
            // Stats
            stats::StatsResponse,
            stats::RequestStats,
            stats::TrendEntry,
            stats::StatEntry,
            stats::ItemStatsResponse,
            stats::CategoryStatEntry,
            stats::ExportType,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "items", description = "Inventory item management"),
        (name = "categories", description = "Category management"),
        (name = "requests", description = "Borrow request lifecycle"),
        (name = "users", description = "User management"),
        (name = "stats", description = "Statistics and export")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
