use crate::{
    entities::meal_type,
    errors::ServiceError,
    handlers::AppState,
    services::menu::MenuItemView,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Public catalog routes
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-types", get(list_meal_types))
        .route("/menu/:meal_type_id", get(menu_for_meal_type))
}

#[utoipa::path(
    get,
    path = "/api/meal-types",
    summary = "List meal types",
    responses((status = 200, description = "All meal types", body = [meal_type::Model])),
    tag = "menu"
)]
pub async fn list_meal_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<meal_type::Model>>, ServiceError> {
    Ok(Json(state.services.menu.list_meal_types().await?))
}

#[utoipa::path(
    get,
    path = "/api/menu/{meal_type_id}",
    summary = "Menu for a meal type",
    description = "Available items only, ordered by name.",
    params(("meal_type_id" = i32, Path, description = "Meal type ID")),
    responses((status = 200, description = "Available menu items", body = [MenuItemView])),
    tag = "menu"
)]
pub async fn menu_for_meal_type(
    State(state): State<AppState>,
    Path(meal_type_id): Path<i32>,
) -> Result<Json<Vec<MenuItemView>>, ServiceError> {
    Ok(Json(
        state.services.menu.menu_for_meal_type(meal_type_id).await?,
    ))
}
