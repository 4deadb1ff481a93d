use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::Result,
    handlers::AppJson,
    models::users::{AuthResponse, LoginUser, RegisterUser},
    services::users,
    state::AppState,
};

/// POST /api/v1/auth/register
///
/// Registers a new account and returns it together with an access token.
///
/// # Request Body
/// - `email`: must be unique (case-insensitive)
/// - `password`: 6 to 128 characters
/// - `name`: display name
/// - `role`: optional, `USER` (default) or `ADMIN`
///
/// # HTTP Status Codes
/// - `201 CREATED`: account created
/// - `400 BAD_REQUEST`: validation error
/// - `403 FORBIDDEN`: role selection is disabled and a non-USER role was requested
/// - `409 CONFLICT`: email already registered
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterUser>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let mut conn = state.pool.acquire().await?;
    let response = users::register_user(&mut conn, &state.config, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// # HTTP Status Codes
/// - `200 OK`: credentials accepted
/// - `401 UNAUTHORIZED`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginUser>,
) -> Result<Json<AuthResponse>> {
    let mut conn = state.pool.acquire().await?;
    let response = users::login_user(&mut conn, &state.config, request).await?;
    Ok(Json(response))
}
