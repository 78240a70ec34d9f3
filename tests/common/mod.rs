#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;

use canteen_api::{
    auth::hash_password,
    build_router,
    config::AppConfig,
    db,
    entities::{meal_type, menu_item, user, user::ADMIN_ROLE},
    AppState,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Helper harness for spinning up the full application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a fresh, migrated database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self { router, state }
    }

    pub async fn seed_meal_type(&self, name: &str) -> meal_type::Model {
        meal_type::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed meal type")
    }

    pub async fn seed_menu_item(
        &self,
        meal_type_id: i32,
        name: &str,
        price: Decimal,
        is_available: bool,
    ) -> menu_item::Model {
        let now = Utc::now();
        menu_item::ActiveModel {
            name: Set(name.to_string()),
            price: Set(price),
            meal_type_id: Set(meal_type_id),
            is_available: Set(is_available),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed menu item")
    }

    pub async fn seed_admin(&self) -> user::Model {
        user::ActiveModel {
            username: Set(ADMIN_USERNAME.to_string()),
            password_hash: Set(hash_password(ADMIN_PASSWORD).expect("hash admin password")),
            role: Set(ADMIN_ROLE.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed admin user")
    }

    /// Seeds the admin account and logs in through the API.
    pub async fn admin_token(&self) -> String {
        self.seed_admin().await;
        let response = self
            .request(
                Method::POST,
                "/api/admin/login",
                Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
