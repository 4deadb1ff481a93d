//! Bearer-token authentication
//!
//! Verifies the `Authorization: Bearer <token>` header and resolves the
//! token's subject back to a live user record.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::users::{Role, User},
    services::{jwt::authenticate_jwt_token, users::resolve_token_user},
    state::AppState,
};

/// Authenticated user extracted from JWT token
///
/// Added to request extensions by the access-policy middleware for every
/// route that is not public.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Authenticates a request from its headers
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Validates JWT signature and expiration
/// 3. Loads the user named by the token's subject
///
/// The role is taken from the stored user, not from the token, so role
/// changes apply to tokens issued before them.
///
/// # Errors
/// * `Authentication` - header missing or malformed, token invalid or
///   expired, or the user no longer exists
pub async fn authenticate_request(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser> {
    let auth_header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            Error::Authentication("Invalid Authorization header".to_string())
        })?),
        None => None,
    };

    let claims = authenticate_jwt_token(auth_header, state.config.jwt.secret.expose_secret())?;

    let mut conn = state.pool.acquire().await?;
    let user = resolve_token_user(&mut conn, &claims).await.inspect_err(|_| {
        tracing::warn!(subject = %claims.sub, "[Auth] Middleware: Token subject not found");
    })?;

    Ok(user.into())
}
