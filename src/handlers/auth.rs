use crate::{
    auth::{LoginRequest, LoginResponse},
    errors::ServiceError,
    handlers::{AppJson, AppState},
};
use axum::{extract::State, routing::post, Json, Router};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(admin_login))
}

/// Admin login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    summary = "Admin login",
    description = "Verifies admin credentials and returns a bearer token for the admin endpoints.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
    ),
    tag = "admin"
)]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    Ok(Json(state.services.auth.login(request).await?))
}
