//! Route table
//!
//! Each route is declared together with its [`AccessPolicy`]; the policy is
//! attached as a route layer so it only runs for that method and path.

use axum::{
    Router,
    http::HeaderName,
    middleware,
    routing::{MethodRouter, delete, get, patch, post},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, cart, health, products},
    middleware::policy::{AccessPolicy, PolicyGuard, enforce_access_policy},
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps a method router with the given access policy.
fn with_policy(
    state: &AppState,
    policy: AccessPolicy,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PolicyGuard::new(state.clone(), policy),
        enforce_access_policy,
    ))
}

fn api_routes(state: &AppState) -> Router<AppState> {
    use AccessPolicy::{Authenticated, Public};
    let admin = AccessPolicy::ADMIN_ONLY;

    Router::new()
        .route("/health", with_policy(state, Public, get(health::health_check)))
        .route("/auth/register", with_policy(state, Public, post(auth::register)))
        .route("/auth/login", with_policy(state, Public, post(auth::login)))
        .route(
            "/products",
            with_policy(state, Public, get(products::list_products))
                .merge(with_policy(state, admin, post(products::create_product))),
        )
        .route(
            "/products/categories",
            with_policy(state, Public, get(products::list_categories)),
        )
        .route(
            "/products/category/{category}",
            with_policy(state, Public, get(products::list_products_by_category)),
        )
        .route(
            "/products/{id}",
            with_policy(state, Public, get(products::get_product))
                .merge(with_policy(state, admin, patch(products::update_product)))
                .merge(with_policy(state, admin, delete(products::delete_product))),
        )
        .route("/cart", with_policy(state, Authenticated, get(cart::get_cart)))
        .route("/cart/items", with_policy(state, Authenticated, post(cart::add_item)))
        .route(
            "/cart/items/{id}",
            with_policy(state, Authenticated, patch(cart::update_item))
                .merge(with_policy(state, Authenticated, delete(cart::remove_item))),
        )
        .route("/cart/clear", with_policy(state, Authenticated, delete(cart::clear_cart)))
        .route("/cart/checkout", with_policy(state, Authenticated, post(cart::checkout)))
}

/// Builds the full application router with the `/api/v1` routes and the
/// tracing, request-id and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v1", api_routes(&state))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
