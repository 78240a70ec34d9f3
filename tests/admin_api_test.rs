mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use canteen_api::handlers::admin::TOTAL_AMOUNT_HEADER;
use common::{read_json, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};

#[tokio::test]
async fn root_and_health_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["database"], "up");
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health", None, None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::new().await;
    app.seed_admin().await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "username": "nobody", "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_admin_and_token() {
    let app = TestApp::new().await;
    app.seed_admin().await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Admin login successful");
    assert_eq!(body["user"]["username"], ADMIN_USERNAME);
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body["token"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn admin_routes_require_a_valid_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/admin/orders",
        "/api/admin/all-menu-items",
        "/api/admin/preparation-summary",
        "/api/admin/daily-financial-summary",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let response = app.request(Method::GET, uri, None, Some("not-a-jwt")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn public_menu_lists_available_items_by_name() {
    let app = TestApp::new().await;
    let lunch = app.seed_meal_type("Lunch").await;
    let snacks = app.seed_meal_type("Snacks").await;
    app.seed_menu_item(lunch.id, "Rice", dec!(20.00), true).await;
    app.seed_menu_item(lunch.id, "Biryani", dec!(120.00), true).await;
    app.seed_menu_item(lunch.id, "Fish Curry", dec!(150.00), false).await;
    app.seed_menu_item(snacks.id, "Tea", dec!(10.00), true).await;

    let types = read_json(app.request(Method::GET, "/api/meal-types", None, None).await).await;
    assert_eq!(types.as_array().map(Vec::len), Some(2));

    let menu = read_json(
        app.request(Method::GET, &format!("/api/menu/{}", lunch.id), None, None)
            .await,
    )
    .await;
    let names: Vec<&str> = menu
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Biryani", "Rice"]);

    let empty = read_json(app.request(Method::GET, "/api/menu/999", None, None).await).await;
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn menu_item_crud() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let breakfast = app.seed_meal_type("Breakfast").await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/menu-items",
            Some(json!({ "name": "Dosa", "price": "45.5", "mealTypeId": breakfast.id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["price"], "45.50");
    assert_eq!(created["is_available"], true);
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/menu-items/{}", id),
            Some(json!({ "name": "Masala Dosa", "price": 55, "mealTypeId": breakfast.id, "isAvailable": false })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["name"], "Masala Dosa");
    assert_eq!(updated["is_available"], false);

    let all = read_json(
        app.request(Method::GET, "/api/admin/all-menu-items", None, Some(&token))
            .await,
    )
    .await;
    assert_eq!(all.as_array().map(Vec::len), Some(1));

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/admin/menu-items/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/admin/menu-items/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn menu_item_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let breakfast = app.seed_meal_type("Breakfast").await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/menu-items",
            Some(json!({ "name": "Dosa", "price": "-1", "mealTypeId": breakfast.id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/admin/menu-items",
            Some(json!({ "name": "Dosa", "price": "10", "mealTypeId": 404 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_ordered_item_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let lunch = app.seed_meal_type("Lunch").await;
    let rice = app.seed_menu_item(lunch.id, "Rice", dec!(20.00), true).await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "customerName": "Asha", "items": [{ "menuItemId": rice.id, "quantity": 1 }] })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/admin/menu-items/{}", rice.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn daily_financial_summary_sums_todays_orders() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let lunch = app.seed_meal_type("Lunch").await;
    let rice = app.seed_menu_item(lunch.id, "Rice", dec!(20.00), true).await;
    let dal = app.seed_menu_item(lunch.id, "Dal", dec!(12.50), true).await;

    for (name, item, quantity) in [("A", rice.id, 2), ("B", dal.id, 3)] {
        let response = app
            .request(
                Method::POST,
                "/api/orders",
                Some(json!({ "customerName": name, "items": [{ "menuItemId": item, "quantity": quantity }] })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(Method::GET, "/api/admin/daily-financial-summary", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let total: Decimal = response
        .headers()
        .get(TOTAL_AMOUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("total amount header");
    assert_eq!(total, dec!(77.50));

    let orders = read_json(response).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["customer_name"], "B");

    let listed = read_json(app.request(Method::GET, "/api/admin/orders", None, Some(&token)).await).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn mistyped_admin_bodies_are_rejected_as_json() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/menu-items",
            Some(json!({ "name": "Dosa", "price": "cheap", "mealTypeId": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());

    let response = app
        .request(
            Method::PUT,
            "/api/admin/orders/1/status",
            Some(json!({ "status": 3 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());

    let response = app
        .request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "username": ["admin"], "password": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_status_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            Method::PUT,
            "/api/admin/orders/1/status",
            Some(json!({ "status": "Shipped" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PUT,
            "/api/admin/orders/1/status",
            Some(json!({ "status": "Ready" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = read_json(response).await;
    assert!(doc["paths"].get("/api/orders").is_some());
}
