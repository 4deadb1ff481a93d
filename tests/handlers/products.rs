use crate::common::{TestApp, auth_header, helpers::token_for};
use rust_decimal::Decimal;

fn product_body(app: &TestApp, label: &str) -> serde_json::Value {
    serde_json::json!({
        "name": app.test_db.product_name(label),
        "description": "A test product",
        "price": "19.99",
        "stock": 10,
        "category": "GAMES"
    })
}

async fn create_as_admin(app: &TestApp, token: &str, label: &str) -> serde_json::Value {
    let response = app
        .client
        .post(app.url("/api/v1/products"))
        .header("Authorization", auth_header(token))
        .json(&product_body(app, label))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_create_product_requires_token() {
    let app = TestApp::new("test_create_product_requires_token").await;

    let response = app
        .client
        .post(app.url("/api/v1/products"))
        .json(&product_body(&app, "anonymous"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_create_product_rejects_invalid_token() {
    let app = TestApp::new("test_create_product_invalid_token").await;

    let response = app
        .client
        .post(app.url("/api/v1/products"))
        .header("Authorization", "Bearer not-a-jwt")
        .json(&product_body(&app, "forged"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_create_product_forbidden_for_user_role() {
    let app = TestApp::new("test_create_product_forbidden_user").await;
    let token = token_for(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/products"))
        .header("Authorization", auth_header(&token))
        .json(&product_body(&app, "not_allowed"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_product_lifecycle() {
    let app = TestApp::new("test_admin_product_lifecycle").await;
    let token = token_for(&app, "ADMIN").await;

    let created = create_as_admin(&app, &token, "board_game").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["category"], "GAMES");
    assert_eq!(
        created["price"].as_str().unwrap().parse::<Decimal>().unwrap(),
        Decimal::new(1999, 2)
    );

    // Public read
    let response = app
        .client
        .get(app.url(&format!("/api/v1/products/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .patch(app.url(&format!("/api/v1/products/{}", id)))
        .header("Authorization", auth_header(&token))
        .json(&serde_json::json!({ "stock": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["stock"], 3);
    assert_eq!(updated["name"], created["name"]);

    let response = app
        .client
        .delete(app.url(&format!("/api/v1/products/{}", id)))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .get(app.url(&format!("/api/v1/products/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_duplicate_product_returns_400() {
    let app = TestApp::new("test_create_duplicate_product_400").await;
    let token = token_for(&app, "ADMIN").await;

    create_as_admin(&app, &token, "chess").await;

    let response = app
        .client
        .post(app.url("/api/v1/products"))
        .header("Authorization", auth_header(&token))
        .json(&product_body(&app, "chess"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_list_products_by_category_endpoint() {
    let app = TestApp::new("test_list_by_category_endpoint").await;
    let token = token_for(&app, "ADMIN").await;
    let created = create_as_admin(&app, &token, "puzzle").await;

    let response = app
        .client
        .get(app.url("/api/v1/products/category/games"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let games: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(games.iter().any(|p| p["id"] == created["id"]));
    assert!(games.iter().all(|p| p["category"] == "GAMES"));

    let response = app
        .client
        .get(app.url("/api/v1/products/category/INVALID"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .get(app.url("/api/v1/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let all: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(all.iter().any(|p| p["id"] == created["id"]));
}

#[tokio::test]
async fn test_list_categories_endpoint() {
    let app = TestApp::new("test_list_categories_endpoint").await;

    let categories: Vec<String> = app
        .client
        .get(app.url("/api/v1/products/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        categories,
        vec!["ELECTRONICS", "CLOTHING", "ACCESSORIES", "BOOKS", "GAMES", "OTHER"]
    );
}

#[tokio::test]
async fn test_malformed_product_id_returns_400() {
    let app = TestApp::new("test_malformed_product_id_400").await;

    let response = app
        .client
        .get(app.url("/api/v1/products/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
