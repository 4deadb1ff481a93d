use crate::{
    error::{Error, Result},
    models::users::{Role, User},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user_id as string
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    /// Expiration time as Unix timestamp
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| Error::Authentication("Invalid token subject".to_string()))
    }
}

/// Generates a signed bearer token for a user
///
/// # Arguments
/// * `user` - The authenticated user; id, email and role are embedded
/// * `secret` - The JWT secret key for signing
/// * `expiration_minutes` - Token lifetime in minutes (from config)
///
/// # Example
/// ```rust,no_run
/// # fn demo(user: &shopline::models::users::User) -> shopline::error::Result<()> {
/// use shopline::services::jwt::generate_jwt;
///
/// let token = generate_jwt(user, "my-secret", 1440)?;
/// # Ok(())
/// # }
/// ```
pub fn generate_jwt(user: &User, secret: &str, expiration_minutes: i64) -> Result<String> {
    let now = Utc::now();
    let expiration = now + Duration::minutes(expiration_minutes);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))
}

/// Verifies a JWT token and returns the claims if valid
///
/// # Errors
/// Returns an authentication error if the token is malformed, expired,
/// or has a bad signature
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::Authentication("Token has expired".to_string()),
        ErrorKind::InvalidSignature => {
            Error::Authentication("Invalid token signature".to_string())
        }
        _ => Error::Authentication("Invalid token".to_string()),
    })?;

    Ok(token_data.claims)
}

/// Validates the JWT carried in an Authorization header value
/// Format: "Authorization: Bearer <token>"
pub fn authenticate_jwt_token(auth_header: Option<&str>, secret: &str) -> Result<Claims> {
    let token = extract_token_from_header(auth_header)?;
    verify_jwt(token, secret)
}

/// Extracts the Bearer token from the Authorization header
fn extract_token_from_header(auth_header: Option<&str>) -> Result<&str> {
    match auth_header {
        Some(header) => {
            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                Error::Authentication(
                    "Invalid Authorization header format. Expected: 'Bearer <token>'".to_string(),
                )
            })?;
            let token = token.trim();
            if token.is_empty() {
                return Err(Error::Authentication("Empty token".to_string()));
            }
            Ok(token)
        }
        None => Err(Error::Authentication("Missing Authorization header".to_string())),
    }
}
