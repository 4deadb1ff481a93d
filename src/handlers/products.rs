//! Catalog handlers
//!
//! Reads are public; writes are restricted to administrators by the route
//! table in `router`.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::{AppJson, AppPath},
    models::{
        products::{Category, Product, UpdateProduct},
        requests::CreateProductRequest,
    },
    services::products,
    state::AppState,
};

/// GET /api/v1/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(products::list_products(&mut conn).await?))
}

/// GET /api/v1/products/categories
pub async fn list_categories() -> Json<Vec<Category>> {
    Json(products::list_categories())
}

/// GET /api/v1/products/category/{category}
///
/// The category is matched case-insensitively.
///
/// # HTTP Status Codes
/// - `200 OK`: products in the category (possibly empty)
/// - `400 BAD_REQUEST`: unknown category
pub async fn list_products_by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<Vec<Product>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(
        products::list_products_by_category(&mut conn, &category).await?,
    ))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Product>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(products::get_product(&mut conn, id).await?))
}

/// POST /api/v1/products
///
/// # HTTP Status Codes
/// - `201 CREATED`: product created
/// - `400 BAD_REQUEST`: validation error or duplicate name
/// - `401`/`403`: missing token or not an administrator
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut conn = state.pool.acquire().await?;
    let product = products::create_product(&mut conn, request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/v1/products/{id}
///
/// Only the fields present in the body are changed.
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<UpdateProduct>,
) -> Result<Json<Product>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(products::update_product(&mut conn, id, update).await?))
}

/// DELETE /api/v1/products/{id}
///
/// # HTTP Status Codes
/// - `204 NO_CONTENT`: deleted
/// - `404 NOT_FOUND`: no such product
/// - `409 CONFLICT`: the product is still in a cart
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode> {
    let mut conn = state.pool.acquire().await?;
    products::delete_product(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
