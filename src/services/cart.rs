//! Shopping cart operations.
//!
//! Product stock doubles as a reservation counter: adding to a cart takes
//! units out of stock, removing or clearing puts them back, and checkout
//! keeps them out (the units are sold).
//!
//! Every mutation runs in one transaction that starts by locking the cart
//! row, so two requests on the same cart never act on the same lines. Stock
//! is taken with a conditional update (`stock >= n`), so concurrent carts can
//! never drive it negative.

use chrono::Utc;
use sqlx::Connection;
use uuid::Uuid;

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        cart::{Cart, CartItem, CartView, CheckoutSummary, NewCartItem},
        products::Product,
        requests::{AddItemRequest, UpdateItemQuantityRequest},
    },
    queries::{carts, products},
    services::products::product_not_found,
};

/// How a line's quantity change affects product stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Take this many more units out of stock.
    Reserve(i32),
    /// Put this many units back into stock.
    Release(i32),
    Unchanged,
}

impl StockAdjustment {
    pub fn for_quantity_change(current: i32, requested: i32) -> Self {
        match requested - current {
            delta if delta > 0 => StockAdjustment::Reserve(delta),
            delta if delta < 0 => StockAdjustment::Release(-delta),
            _ => StockAdjustment::Unchanged,
        }
    }
}

fn insufficient_stock(product: &Product) -> Error {
    Error::Validation(format!(
        "Insufficient stock for product {}. Available: {}",
        product.name, product.stock
    ))
}

fn item_not_found(item_id: Uuid) -> Error {
    Error::NotFound(format!("Item {} not found in cart", item_id))
}

/// Builds the client-facing view of a cart with its joined lines.
async fn cart_view(conn: &mut DbConn, cart: Cart) -> Result<CartView> {
    let lines = carts::list_cart_lines(conn, cart.id).await?;
    Ok(CartView::new(cart, lines))
}

/// Takes `quantity` units of a product out of stock, failing with a
/// validation error naming the product when not enough is left.
async fn reserve(conn: &mut DbConn, product_id: Uuid, quantity: i32) -> Result<Product> {
    if let Some(product) = products::reserve_stock(conn, product_id, quantity).await? {
        return Ok(product);
    }

    let product = products::get_product_by_id(conn, product_id)
        .await?
        .ok_or_else(|| product_not_found(product_id))?;
    Err(insufficient_stock(&product))
}

/// Scoped lookup: a line that belongs to another user's cart is reported as missing.
async fn find_item(conn: &mut DbConn, cart: &Cart, item_id: Uuid) -> Result<CartItem> {
    carts::get_cart_item(conn, cart.id, item_id)
        .await?
        .ok_or_else(|| item_not_found(item_id))
}

/// Returns the user's cart, creating an empty one on first access
pub async fn get_cart(conn: &mut DbConn, user_id: Uuid) -> Result<CartView> {
    let cart = carts::get_or_create_cart(conn, user_id).await?;
    cart_view(conn, cart).await
}

/// Adds a product to the user's cart, merging with an existing line
///
/// # Errors
/// * `Validation` - quantity is not positive, or exceeds the available stock
///   (for an existing line the combined quantity is checked)
/// * `NotFound` - the product does not exist
pub async fn add_item(
    conn: &mut DbConn,
    user_id: Uuid,
    request: AddItemRequest,
) -> Result<CartView> {
    let AddItemRequest {
        product_id,
        quantity,
    } = request;

    if quantity <= 0 {
        return Err(Error::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let mut tx = conn.begin().await?;
    let cart = carts::lock_cart(&mut tx, user_id).await?;

    let product = products::get_product_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| product_not_found(product_id))?;

    if quantity > product.stock {
        return Err(insufficient_stock(&product));
    }

    match carts::get_cart_item_by_product(&mut tx, cart.id, product_id).await? {
        Some(existing) => {
            let combined = existing
                .quantity
                .checked_add(quantity)
                .filter(|combined| *combined <= product.stock)
                .ok_or_else(|| insufficient_stock(&product))?;

            carts::update_cart_item_quantity(&mut tx, existing.id, combined).await?;
        }
        None => {
            carts::create_cart_item(
                &mut tx,
                NewCartItem {
                    cart_id: cart.id,
                    product_id,
                    quantity,
                    price: product.price,
                },
            )
            .await?;
        }
    }

    let product = reserve(&mut tx, product_id, quantity).await?;

    let cart = carts::recalculate_total(&mut tx, cart.id).await?;
    let view = cart_view(&mut tx, cart).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        product_id = %product_id,
        quantity,
        remaining_stock = product.stock,
        total = %view.total,
        "[Cart] Service: Added item"
    );

    Ok(view)
}

/// Removes a line from the user's cart and returns its units to stock
///
/// # Errors
/// * `NotFound` - the line does not belong to the user's cart
/// * `Validation` - the returned units would overflow the product's stock
pub async fn remove_item(conn: &mut DbConn, user_id: Uuid, item_id: Uuid) -> Result<CartView> {
    let mut tx = conn.begin().await?;

    let cart = carts::lock_cart(&mut tx, user_id).await?;
    let item = find_item(&mut tx, &cart, item_id).await?;

    if carts::delete_cart_item(&mut tx, item.id).await? == 0 {
        return Err(item_not_found(item_id));
    }
    products::release_stock(&mut tx, item.product_id, item.quantity).await?;

    let cart = carts::recalculate_total(&mut tx, cart.id).await?;
    let view = cart_view(&mut tx, cart).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        item_id = %item_id,
        released = item.quantity,
        "[Cart] Service: Removed item"
    );

    Ok(view)
}

/// Sets a line's quantity, adjusting stock by the difference
///
/// A quantity of zero removes the line.
///
/// # Errors
/// * `Validation` - quantity is negative, or the increase exceeds available stock
/// * `NotFound` - the line does not belong to the user's cart
pub async fn update_item_quantity(
    conn: &mut DbConn,
    user_id: Uuid,
    item_id: Uuid,
    request: UpdateItemQuantityRequest,
) -> Result<CartView> {
    let quantity = request.quantity;

    if quantity < 0 {
        return Err(Error::Validation("Quantity cannot be negative".to_string()));
    }

    if quantity == 0 {
        return remove_item(conn, user_id, item_id).await;
    }

    let mut tx = conn.begin().await?;

    let cart = carts::lock_cart(&mut tx, user_id).await?;
    let item = find_item(&mut tx, &cart, item_id).await?;

    let adjustment = StockAdjustment::for_quantity_change(item.quantity, quantity);
    match adjustment {
        StockAdjustment::Reserve(units) => {
            reserve(&mut tx, item.product_id, units).await?;
        }
        StockAdjustment::Release(units) => {
            products::release_stock(&mut tx, item.product_id, units).await?;
        }
        StockAdjustment::Unchanged => {}
    }

    if adjustment != StockAdjustment::Unchanged {
        carts::update_cart_item_quantity(&mut tx, item.id, quantity).await?;
    }

    let cart = carts::recalculate_total(&mut tx, cart.id).await?;
    let view = cart_view(&mut tx, cart).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        item_id = %item_id,
        from = item.quantity,
        to = quantity,
        "[Cart] Service: Updated item quantity"
    );

    Ok(view)
}

/// Empties the user's cart, returning every line's units to stock
pub async fn clear_cart(conn: &mut DbConn, user_id: Uuid) -> Result<CartView> {
    let mut tx = conn.begin().await?;

    let cart = carts::lock_cart(&mut tx, user_id).await?;
    let lines = carts::list_cart_lines(&mut tx, cart.id).await?;

    for line in &lines {
        products::release_stock(&mut tx, line.product_id, line.quantity).await?;
    }
    let removed = carts::delete_cart_items(&mut tx, cart.id).await?;

    let cart = carts::recalculate_total(&mut tx, cart.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        removed_items = removed,
        "[Cart] Service: Cleared cart"
    );

    Ok(CartView::new(cart, Vec::new()))
}

/// Completes the purchase of everything in the user's cart
///
/// The cart is emptied and its total reset; stock is not restored because
/// the units were already taken when they were added.
///
/// # Errors
/// * `Validation` - the cart is empty
pub async fn checkout(conn: &mut DbConn, user_id: Uuid) -> Result<CheckoutSummary> {
    let mut tx = conn.begin().await?;

    let cart = carts::lock_cart(&mut tx, user_id).await?;
    let lines = carts::list_cart_lines(&mut tx, cart.id).await?;

    if lines.is_empty() {
        return Err(Error::Validation("Cart is empty".to_string()));
    }

    let summary = CheckoutSummary::from_lines(&lines, Utc::now());

    carts::delete_cart_items(&mut tx, cart.id).await?;
    carts::recalculate_total(&mut tx, cart.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        items = summary.items.len(),
        total = %summary.total,
        "[Cart] Service: Checkout completed"
    );

    Ok(summary)
}
