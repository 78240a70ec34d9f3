use crate::{
    auth::AuthRouterExt,
    entities::{user::ADMIN_ROLE, OrderStatus},
    errors::ServiceError,
    handlers::{AppJson, AppState},
    services::{
        menu::{MenuItemInput, MenuItemView},
        orders::OrderRecord,
        reports::PreparationLine,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Header carrying the summed `total_amount` of the daily financial summary.
pub const TOTAL_AMOUNT_HEADER: &str = "x-total-amount";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    #[schema(example = "Completed")]
    pub status: String,
}

/// Admin routes; every one requires an admin bearer token.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/menu-items", post(create_menu_item))
        .route(
            "/menu-items/:id",
            put(update_menu_item).delete(delete_menu_item),
        )
        .route("/all-menu-items", get(list_all_menu_items))
        .route("/orders", get(list_orders))
        .route("/orders/:id/status", put(update_order_status))
        .route("/preparation-summary", get(preparation_summary))
        .route("/daily-financial-summary", get(daily_financial_summary))
        .with_role(ADMIN_ROLE)
}

#[utoipa::path(
    post,
    path = "/api/admin/menu-items",
    summary = "Create menu item",
    request_body = MenuItemInput,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemView),
        (status = 400, description = "Invalid item", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    AppJson(input): AppJson<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItemView>), ServiceError> {
    let item = state.services.menu.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu-items/{id}",
    summary = "Update menu item",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body = MenuItemInput,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemView),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(input): AppJson<MenuItemInput>,
) -> Result<Json<MenuItemView>, ServiceError> {
    Ok(Json(state.services.menu.update_item(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu-items/{id}",
    summary = "Delete menu item",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Menu item appears in existing orders", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.menu.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/all-menu-items",
    summary = "List every menu item",
    responses((status = 200, description = "All menu items", body = [MenuItemView])),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn list_all_menu_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItemView>>, ServiceError> {
    Ok(Json(state.services.menu.list_all_items().await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    summary = "List orders",
    description = "All orders, newest first.",
    responses((status = 200, description = "Orders", body = [OrderRecord])),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderRecord>>, ServiceError> {
    Ok(Json(state.services.orders.list_orders().await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    summary = "Update order status",
    description = "Any status may be set from any other status.",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order row", body = OrderRecord),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<UpdateStatusRequest>,
) -> Result<Json<OrderRecord>, ServiceError> {
    let status = OrderStatus::from_str(request.status.trim()).map_err(|_| {
        ServiceError::ValidationError(format!(
            "Invalid status '{}'. Expected one of: Pending, Confirmed, Ready, Completed, Cancelled",
            request.status
        ))
    })?;
    Ok(Json(
        state.services.orders.update_order_status(id, status).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/preparation-summary",
    summary = "Today's preparation summary",
    description = "Quantities per item over today's Pending and Confirmed orders.",
    responses((status = 200, description = "Per-item quantities", body = [PreparationLine])),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn preparation_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<PreparationLine>>, ServiceError> {
    Ok(Json(state.services.reports.preparation_summary().await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/daily-financial-summary",
    summary = "Today's orders and revenue",
    responses((status = 200, description = "Today's orders, newest first", body = [OrderRecord],
        headers(("X-Total-Amount" = String, description = "Sum of total_amount over the listed orders"))
    )),
    security(("Bearer" = [])),
    tag = "admin"
)]
pub async fn daily_financial_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.reports.daily_financial_summary().await?;
    Ok((
        [(TOTAL_AMOUNT_HEADER, summary.total_amount.to_string())],
        Json(summary.orders),
    ))
}
