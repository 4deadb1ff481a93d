//! Shared test helper functions

use crate::common::TestApp;

/// Formats a bearer Authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers a user over HTTP and returns the response body
/// (`{id, email, name, role, token}`)
pub async fn register_user_via_api(app: &TestApp, role: &str) -> serde_json::Value {
    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&serde_json::json!({
            "email": app.test_db.generate_test_email(),
            "password": "SecurePass123!",
            "name": "Api User",
            "role": role,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

/// Registers a user over HTTP and returns only the token
pub async fn token_for(app: &TestApp, role: &str) -> String {
    let body = register_user_via_api(app, role).await;
    body["token"].as_str().unwrap().to_string()
}
