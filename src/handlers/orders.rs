use crate::{
    errors::ServiceError,
    handlers::{AppJson, AppState},
    services::orders::{Cart, OrderReceipt},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlacedOrderResponse {
    #[schema(example = "Order placed successfully")]
    pub message: String,
    #[serde(flatten)]
    pub receipt: OrderReceipt,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedOrderResponse {
    #[schema(example = "Order updated successfully")]
    pub message: String,
    pub order: OrderReceipt,
}

/// Creates the router for customer order endpoints
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/:id", get(get_order).put(update_order))
}

/// Place a new order
#[utoipa::path(
    post,
    path = "/api/orders",
    summary = "Place order",
    description = "Atomically creates an order and its items from a cart. Prices are captured at placement time.",
    request_body = Cart,
    responses(
        (status = 201, description = "Order placed", body = PlacedOrderResponse,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Empty cart, blank name or bad quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Menu item not found; nothing was persisted", body = crate::errors::ErrorResponse),
        (status = 500, description = "Transaction failed", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    AppJson(cart): AppJson<Cart>,
) -> Result<(StatusCode, Json<PlacedOrderResponse>), ServiceError> {
    let receipt = state.services.orders.place_order(cart).await?;
    Ok((
        StatusCode::CREATED,
        Json(PlacedOrderResponse {
            message: "Order placed successfully".to_string(),
            receipt,
        }),
    ))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    summary = "Get order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = OrderReceipt),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderReceipt>, ServiceError> {
    Ok(Json(state.services.orders.get_order(id).await?))
}

/// Replace an order's customer name and items
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    summary = "Replace order contents",
    description = "Full replace: the submitted items become the order's only items. Status is unchanged.",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = Cart,
    responses(
        (status = 200, description = "Order updated", body = UpdatedOrderResponse),
        (status = 400, description = "Empty cart, blank name or bad quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or menu item not found; previous contents kept", body = crate::errors::ErrorResponse),
        (status = 500, description = "Transaction failed", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(cart): AppJson<Cart>,
) -> Result<Json<UpdatedOrderResponse>, ServiceError> {
    let order = state.services.orders.set_order_contents(id, cart).await?;
    Ok(Json(UpdatedOrderResponse {
        message: "Order updated successfully".to_string(),
        order,
    }))
}
