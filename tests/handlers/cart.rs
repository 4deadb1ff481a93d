use crate::common::{TestApp, auth_header, helpers::token_for};
use rust_decimal::Decimal;
use shopline::models::users::Role;

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_cart_requires_token() {
    let app = TestApp::new("test_cart_requires_token").await;

    for (method, path) in [
        (reqwest::Method::GET, "/api/v1/cart"),
        (reqwest::Method::POST, "/api/v1/cart/items"),
        (reqwest::Method::DELETE, "/api/v1/cart/clear"),
        (reqwest::Method::POST, "/api/v1/cart/checkout"),
    ] {
        let response = app
            .client
            .request(method, app.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401, "{} must require a token", path);
    }
}

#[tokio::test]
async fn test_cart_purchase_flow_over_http() {
    let app = TestApp::new("test_cart_purchase_flow_over_http").await;
    let product = app.test_db.create_product("arcade_stick", 100, 10).await;
    let token = token_for(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/cart/items"))
        .header("Authorization", auth_header(&token))
        .json(&serde_json::json!({ "product_id": product.id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&cart["total"]), Decimal::new(300, 0));

    let item = &cart["items"][0];
    assert_eq!(item["quantity"], 3);
    assert_eq!(item["product"]["id"], product.id.to_string());
    assert_eq!(item["product"]["name"], product.name);
    assert_eq!(item["product"]["stock"], 7);
    assert_eq!(decimal(&item["product"]["price"]), Decimal::new(100, 0));
    let item_id = item["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .patch(app.url(&format!("/api/v1/cart/items/{}", item_id)))
        .header("Authorization", auth_header(&token))
        .json(&serde_json::json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&cart["total"]), Decimal::new(500, 0));
    assert_eq!(cart["items"][0]["product"]["stock"], 5);

    let response = app
        .client
        .post(app.url("/api/v1/cart/checkout"))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let summary: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&summary["total"]), Decimal::new(500, 0));
    assert_eq!(summary["items"][0]["product_name"], product.name);
    assert_eq!(summary["message"], "Purchase completed successfully");
    assert!(summary["purchase_date"].is_string());

    let cart: serde_json::Value = app
        .client
        .get(app.url("/api/v1/cart"))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
    assert_eq!(decimal(&cart["total"]), Decimal::ZERO);
    assert_eq!(app.test_db.product_stock(product.id).await, 5);
}

#[tokio::test]
async fn test_add_item_over_stock_returns_400() {
    let app = TestApp::new("test_add_item_over_stock_400").await;
    let product = app.test_db.create_product("limited", 10, 2).await;
    let token = token_for(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/cart/items"))
        .header("Authorization", auth_header(&token))
        .json(&serde_json::json!({ "product_id": product.id, "quantity": 3 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let error: serde_json::Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("Available: 2"));
    assert_eq!(app.test_db.product_stock(product.id).await, 2);
}

#[tokio::test]
async fn test_remove_and_clear_over_http() {
    let app = TestApp::new("test_remove_and_clear_over_http").await;
    let first = app.test_db.create_product("mug", 9, 4).await;
    let second = app.test_db.create_product("poster", 15, 4).await;
    let token = token_for(&app, "USER").await;

    for product_id in [first.id, second.id] {
        let response = app
            .client
            .post(app.url("/api/v1/cart/items"))
            .header("Authorization", auth_header(&token))
            .json(&serde_json::json!({ "product_id": product_id, "quantity": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let cart: serde_json::Value = app
        .client
        .get(app.url("/api/v1/cart"))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mug_line = cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["product_id"] == first.id.to_string())
        .unwrap()
        .clone();

    let response = app
        .client
        .delete(app.url(&format!(
            "/api/v1/cart/items/{}",
            mug_line["id"].as_str().unwrap()
        )))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(app.test_db.product_stock(first.id).await, 4);

    let response = app
        .client
        .delete(app.url("/api/v1/cart/clear"))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
    assert_eq!(app.test_db.product_stock(second.id).await, 4);
}

#[tokio::test]
async fn test_checkout_empty_cart_returns_400() {
    let app = TestApp::new("test_checkout_empty_cart_400").await;
    let token = token_for(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/cart/checkout"))
        .header("Authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_foreign_cart_item_returns_404() {
    let app = TestApp::new("test_foreign_cart_item_404").await;
    let product = app.test_db.create_product("globe", 30, 3).await;
    let owner = app.test_db.create_user(Role::User).await;
    let intruder = token_for(&app, "USER").await;

    let cart: serde_json::Value = app
        .client
        .post(app.url("/api/v1/cart/items"))
        .header("Authorization", auth_header(&owner.token))
        .json(&serde_json::json!({ "product_id": product.id, "quantity": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let item_id = cart["items"][0]["id"].as_str().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/api/v1/cart/items/{}", item_id)))
        .header("Authorization", auth_header(&intruder))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
