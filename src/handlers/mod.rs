pub mod admin;
pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;

use crate::auth::{AuthConfig, AuthService};
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::services::{menu::MenuService, orders::OrderService, reports::ReportService};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub menu: Arc<MenuService>,
    pub reports: Arc<ReportService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, auth_config: AuthConfig) -> Self {
        Self {
            orders: Arc::new(OrderService::new(db_pool.clone())),
            menu: Arc::new(MenuService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool.clone())),
            auth: Arc::new(AuthService::new(auth_config, db_pool)),
        }
    }
}

/// `Json` whose rejections are reported as 400 [`ServiceError`] bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
