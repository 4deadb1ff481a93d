use crate::DbConn;
use crate::{
    config::Config,
    error::{Error, Result},
    models::users::{AuthResponse, LoginUser, NewUser, RegisterUser, Role, User},
    queries::users,
    services::jwt::{Claims, generate_jwt},
    validation::{normalize_email, validate_email, validate_name, validate_password},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registers a new user and returns it together with a fresh bearer token
///
/// # Errors
/// * `Validation` - malformed email, short password or empty name
/// * `Forbidden` - a non-USER role was requested while role selection is disabled
/// * `Conflict` - the email is already registered
pub async fn register_user(
    conn: &mut DbConn,
    config: &Config,
    register_user: RegisterUser,
) -> Result<AuthResponse> {
    validate_email(&register_user.email)?;
    validate_password(&register_user.password)?;
    let name = validate_name(&register_user.name)?;
    let email = normalize_email(&register_user.email);

    let role = register_user.role.unwrap_or_default();
    if role != Role::User && !config.auth.allow_role_selection {
        tracing::warn!(
            email = %email,
            role = %role,
            "[Auth] Service: Rejected registration with elevated role"
        );
        return Err(Error::Forbidden(format!(
            "Registration with role {} is not allowed",
            role
        )));
    }

    if users::get_user_by_email(conn, &email).await?.is_some() {
        return Err(Error::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&register_user.password)?;

    let user = users::create_user(
        conn,
        NewUser {
            email,
            password_hash,
            name,
            role,
        },
    )
    .await?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        "[Auth] Service: Registered new user"
    );

    issue_token(config, user)
}

/// Authenticates a user by email and password
///
/// Unknown emails and wrong passwords produce the same error so callers
/// cannot tell which accounts exist.
pub async fn login_user(
    conn: &mut DbConn,
    config: &Config,
    login_user: LoginUser,
) -> Result<AuthResponse> {
    let email = normalize_email(&login_user.email);

    let Some(user) = users::get_user_by_email(conn, &email).await? else {
        tracing::debug!("[Auth] Service: Login attempt for unknown email");
        return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&login_user.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "[Auth] Service: Login attempt with wrong password");
        return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.id, "[Auth] Service: User logged in");

    issue_token(config, user)
}

/// Resolves verified token claims back to a live user record
///
/// # Errors
/// * `Authentication` - the subject is malformed or the user no longer exists
pub async fn resolve_token_user(conn: &mut DbConn, claims: &Claims) -> Result<User> {
    let user_id = claims.user_id()?;

    users::get_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| Error::Authentication("User not found".to_string()))
}

fn issue_token(config: &Config, user: User) -> Result<AuthResponse> {
    let token = generate_jwt(
        &user,
        config.jwt.secret.expose_secret(),
        config.jwt.access_token_expiration_minutes,
    )?;

    Ok(AuthResponse::new(user, token))
}

/// Hashes a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a password hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
