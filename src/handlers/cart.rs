//! Cart handlers
//!
//! Every route here requires an authenticated user; the cart is always the
//! caller's own, identified by the `AuthenticatedUser` the access-policy
//! middleware put into the request extensions.

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::{AppJson, AppPath},
    middleware::auth::AuthenticatedUser,
    models::{
        cart::{CartView, CheckoutSummary},
        requests::{AddItemRequest, UpdateItemQuantityRequest},
    },
    services::cart,
    state::AppState,
};

/// GET /api/v1/cart
///
/// Returns the caller's cart, creating an empty one on first access.
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<CartView>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(cart::get_cart(&mut conn, auth_user.id).await?))
}

/// POST /api/v1/cart/items
///
/// Adds a product to the cart, taking the units out of stock.
///
/// # HTTP Status Codes
/// - `201 CREATED`: item added (or merged into an existing line)
/// - `400 BAD_REQUEST`: non-positive quantity or insufficient stock
/// - `404 NOT_FOUND`: product does not exist
pub async fn add_item(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let mut conn = state.pool.acquire().await?;
    let view = cart::add_item(&mut conn, auth_user.id, request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /api/v1/cart/items/{id}
///
/// Sets the line's quantity; zero removes it.
pub async fn update_item(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppPath(item_id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateItemQuantityRequest>,
) -> Result<Json<CartView>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(
        cart::update_item_quantity(&mut conn, auth_user.id, item_id, request).await?,
    ))
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppPath(item_id): AppPath<Uuid>,
) -> Result<Json<CartView>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(
        cart::remove_item(&mut conn, auth_user.id, item_id).await?,
    ))
}

/// DELETE /api/v1/cart/clear
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<CartView>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(cart::clear_cart(&mut conn, auth_user.id).await?))
}

/// POST /api/v1/cart/checkout
///
/// # HTTP Status Codes
/// - `200 OK`: purchase summary
/// - `400 BAD_REQUEST`: the cart is empty
pub async fn checkout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<CheckoutSummary>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(cart::checkout(&mut conn, auth_user.id).await?))
}
