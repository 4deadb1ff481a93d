use crate::common::{TestApp, auth_header, register_user_via_api};

#[tokio::test]
async fn test_register_returns_201_with_token() {
    let app = TestApp::new("test_register_returns_201").await;
    let email = app.test_db.generate_test_email();

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123",
            "name": "Jane Doe"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["id"].is_string());
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["role"], "USER");
    assert!(body["token"].is_string());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let app = TestApp::new("test_register_duplicate_409").await;
    let body = register_user_via_api(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({
            "email": body["email"],
            "password": "password123",
            "name": "Someone Else"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_invalid_input_returns_400() {
    let app = TestApp::new("test_register_invalid_input_400").await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({
            "email": "invalid",
            "password": "password123",
            "name": "Jane"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");

    // Missing fields are rejected by the JSON extractor
    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({ "email": app.test_db.generate_test_email() }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_login_returns_token_for_same_user() {
    let app = TestApp::new("test_login_returns_token").await;
    let email = app.test_db.generate_test_email();

    let registered: serde_json::Value = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123",
            "name": "Login User"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = app
        .client
        .post(app.url("/api/v1/auth/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], registered["id"]);

    // The fresh token authenticates cart access
    let token = body["token"].as_str().unwrap();
    let cart: serde_json::Value = app
        .client
        .get(app.url("/api/v1/cart"))
        .header("Authorization", auth_header(token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["user_id"], registered["id"]);
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = TestApp::new("test_login_wrong_password_401").await;
    let body = register_user_via_api(&app, "USER").await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/login"))
        .json(&serde_json::json!({
            "email": body["email"],
            "password": "wrong-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["code"], "AUTHENTICATION_FAILED");
    assert_eq!(error["error"], "Invalid credentials");
}
