use crate::{
    error::{Error, Result, unique_violation},
    models::users::{NewUser, Role, User},
};
use sqlx::Postgres;
use uuid::Uuid;

use crate::DbConn;

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, password_hash, name, role, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.name)
    .bind(new_user.role)
    .fetch_one(conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some("users_email_key") => Error::Conflict("Email already registered".to_string()),
        _ => Error::Sqlx(e),
    })?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        SELECT id, email, password_hash, name, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Gets a single user by their (normalized) email address. The user may not exist.
pub async fn get_user_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        SELECT id, email, password_hash, name, role, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Changes a user's role. Not exposed over HTTP; used for administration and tests.
pub async fn update_user_role(conn: &mut DbConn, id: Uuid, role: Role) -> Result<User> {
    sqlx::query_as::<Postgres, User>(
        r#"
        UPDATE users
        SET role = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, email, password_hash, name, role, created_at, updated_at
        "#,
    )
    .bind(role)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("User with ID {} not found", id)))
}

/// Deletes a user by their ID. Their cart is removed by cascade.
pub async fn delete_user(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
