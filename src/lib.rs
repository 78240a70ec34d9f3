//! Canteen ordering backend
//!
//! Menu browsing, order placement and kitchen/finance reporting over a
//! relational store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod money;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{Extension, Router};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), auth::AuthConfig::from(&config));
        Self {
            db,
            config,
            services,
        }
    }
}

/// Everything mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/orders", handlers::orders::order_routes())
        .merge(handlers::menu::menu_routes())
        .nest(
            "/admin",
            handlers::admin::admin_routes().merge(handlers::auth::auth_routes()),
        )
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                ::tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    } else if cfg.should_allow_permissive_cors() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Assembles the full HTTP application with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::health_routes())
        .nest("/api", api_routes())
        .merge(openapi::openapi_routes())
        .layer(Extension(state.services.auth.clone()))
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(cors_layer(&state.config))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
