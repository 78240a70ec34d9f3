use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Canteen API",
        version = "0.1.0",
        description = r#"
# Canteen ordering API

Customers browse the menu by meal type and place or replace orders.
Each order write is a single transaction: it commits completely or leaves no trace.
Item prices are captured when the order is written.

## Admin authentication

`POST /api/admin/login` returns a token. Every other `/api/admin/*` endpoint requires it:

```
Authorization: Bearer <token>
```
"#
    ),
    servers((url = "http://localhost:5000", description = "Local development")),
    tags(
        (name = "orders", description = "Customer order placement and lookup"),
        (name = "menu", description = "Public menu catalog"),
        (name = "admin", description = "Menu management, order tracking and daily summaries"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::orders::place_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::menu::list_meal_types,
        crate::handlers::menu::menu_for_meal_type,
        crate::handlers::auth::admin_login,
        crate::handlers::admin::create_menu_item,
        crate::handlers::admin::update_menu_item,
        crate::handlers::admin::delete_menu_item,
        crate::handlers::admin::list_all_menu_items,
        crate::handlers::admin::list_orders,
        crate::handlers::admin::update_order_status,
        crate::handlers::admin::preparation_summary,
        crate::handlers::admin::daily_financial_summary,
        crate::handlers::health::health,
    ),
    components(
        schemas(
            crate::services::orders::Cart,
            crate::services::orders::CartLine,
            crate::services::orders::OrderRecord,
            crate::services::orders::OrderReceipt,
            crate::services::orders::ReceiptLine,
            crate::services::menu::MenuItemInput,
            crate::services::menu::MenuItemView,
            crate::services::reports::PreparationLine,
            crate::entities::OrderStatus,
            crate::auth::LoginRequest,
            crate::auth::LoginResponse,
            crate::auth::AdminUser,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the generated document at `/api-docs/openapi.json`.
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
