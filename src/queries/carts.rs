use crate::{
    error::Result,
    models::cart::{Cart, CartItem, CartLine, NewCartItem},
};
use sqlx::Postgres;
use uuid::Uuid;

use crate::DbConn;

const CART_COLUMNS: &str = "id, user_id, total, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, price, created_at, updated_at";

// ============================================================================
// Carts
// ============================================================================

/// Returns the user's cart, creating an empty one on first access.
///
/// Concurrent first accesses are resolved by the unique `user_id` constraint.
pub async fn get_or_create_cart(conn: &mut DbConn, user_id: Uuid) -> Result<Cart> {
    sqlx::query(
        r#"
        INSERT INTO carts (id, user_id, total)
        VALUES ($1, $2, 0)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    let cart = sqlx::query_as::<Postgres, Cart>(&format!(
        "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(cart)
}

/// Returns the user's cart, creating it if needed, and locks its row until
/// the surrounding transaction ends.
///
/// Every cart mutation takes this lock first, so mutations of one cart run
/// one after another and always see the lines the previous one committed.
pub async fn lock_cart(conn: &mut DbConn, user_id: Uuid) -> Result<Cart> {
    get_or_create_cart(conn, user_id).await?;

    let cart = sqlx::query_as::<Postgres, Cart>(&format!(
        "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_one(conn)
    .await?;

    Ok(cart)
}

/// Recomputes the cached total from the cart's lines and stores it.
pub async fn recalculate_total(conn: &mut DbConn, cart_id: Uuid) -> Result<Cart> {
    let cart = sqlx::query_as::<Postgres, Cart>(&format!(
        r#"
        UPDATE carts
        SET total = COALESCE(
                (SELECT SUM(quantity * price) FROM cart_items WHERE cart_id = $1),
                0
            ),
            updated_at = now()
        WHERE id = $1
        RETURNING {CART_COLUMNS}
        "#
    ))
    .bind(cart_id)
    .fetch_one(conn)
    .await?;

    Ok(cart)
}

// ============================================================================
// Cart items
// ============================================================================

/// Lists a cart's lines joined with the echoed product fields, oldest first.
pub async fn list_cart_lines(conn: &mut DbConn, cart_id: Uuid) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<Postgres, CartLine>(
        r#"
        SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.price,
               p.name AS product_name, p.stock AS product_stock, p.price AS product_price
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = $1
        ORDER BY ci.created_at, ci.id
        "#,
    )
    .bind(cart_id)
    .fetch_all(conn)
    .await?;

    Ok(lines)
}

/// Gets a line by ID, scoped to a cart. Lines of other carts are not visible.
pub async fn get_cart_item(
    conn: &mut DbConn,
    cart_id: Uuid,
    item_id: Uuid,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<Postgres, CartItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM cart_items WHERE id = $1 AND cart_id = $2"
    ))
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(conn)
    .await?;

    Ok(item)
}

/// Gets the cart's line for a product, if the product is already in the cart.
pub async fn get_cart_item_by_product(
    conn: &mut DbConn,
    cart_id: Uuid,
    product_id: Uuid,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<Postgres, CartItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 AND product_id = $2"
    ))
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;

    Ok(item)
}

pub async fn create_cart_item(conn: &mut DbConn, new_item: NewCartItem) -> Result<CartItem> {
    let item = sqlx::query_as::<Postgres, CartItem>(&format!(
        r#"
        INSERT INTO cart_items (id, cart_id, product_id, quantity, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(new_item.cart_id)
    .bind(new_item.product_id)
    .bind(new_item.quantity)
    .bind(new_item.price)
    .fetch_one(conn)
    .await?;

    Ok(item)
}

pub async fn update_cart_item_quantity(
    conn: &mut DbConn,
    item_id: Uuid,
    quantity: i32,
) -> Result<CartItem> {
    let item = sqlx::query_as::<Postgres, CartItem>(&format!(
        r#"
        UPDATE cart_items
        SET quantity = $2, updated_at = now()
        WHERE id = $1
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(quantity)
    .fetch_one(conn)
    .await?;

    Ok(item)
}

pub async fn delete_cart_item(conn: &mut DbConn, item_id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(item_id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(rows_affected)
}

/// Removes every line of a cart, returning how many were deleted.
pub async fn delete_cart_items(conn: &mut DbConn, cart_id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(rows_affected)
}
