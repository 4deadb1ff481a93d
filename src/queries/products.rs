//! Database queries for the product catalog, including the conditional
//! stock updates used by the cart.

use crate::{
    error::{Error, Result, foreign_key_violation, out_of_range, unique_violation},
    models::products::{Category, NewProduct, Product, UpdateProduct},
};
use sqlx::Postgres;
use uuid::Uuid;

use crate::DbConn;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, category, created_at, updated_at";

fn map_write_error(e: sqlx::Error, name: Option<&str>) -> Error {
    if let Some("products_name_key") = unique_violation(&e) {
        return Error::Conflict(format!(
            "A product named \"{}\" already exists",
            name.unwrap_or_default()
        ));
    }
    if let sqlx::Error::Database(db) = &e {
        if db.is_check_violation() {
            return Error::Validation(
                "Product price must be positive and stock cannot be negative".to_string(),
            );
        }
    }
    Error::Sqlx(e)
}

/// Creates a new product.
pub async fn create_product(conn: &mut DbConn, new_product: NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<Postgres, Product>(&format!(
        r#"
        INSERT INTO products (id, name, description, price, stock, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(&new_product.name)
    .bind(&new_product.description)
    .bind(new_product.price)
    .bind(new_product.stock)
    .bind(new_product.category)
    .fetch_one(conn)
    .await
    .map_err(|e| map_write_error(e, Some(&new_product.name)))?;

    Ok(product)
}

/// Gets a single product by ID. The product may not exist.
pub async fn get_product_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<Postgres, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Gets a single product by its exact name. The product may not exist.
pub async fn get_product_by_name(conn: &mut DbConn, name: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<Postgres, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Lists every product, oldest first.
pub async fn list_products(conn: &mut DbConn) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<Postgres, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at, id"
    ))
    .fetch_all(conn)
    .await?;

    Ok(products)
}

/// Lists the products of one category, oldest first.
pub async fn list_products_by_category(
    conn: &mut DbConn,
    category: Category,
) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<Postgres, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at, id"
    ))
    .bind(category)
    .fetch_all(conn)
    .await?;

    Ok(products)
}

/// Merges the provided fields into an existing product.
/// Returns `None` when the product does not exist.
pub async fn update_product(
    conn: &mut DbConn,
    id: Uuid,
    update: UpdateProduct,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<Postgres, Product>(&format!(
        r#"
        UPDATE products
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            stock = COALESCE($4, stock),
            category = COALESCE($5, category),
            updated_at = now()
        WHERE id = $6
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(update.name.as_deref())
    .bind(update.description.as_deref())
    .bind(update.price)
    .bind(update.stock)
    .bind(update.category)
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(|e| map_write_error(e, update.name.as_deref()))?;

    Ok(product)
}

/// Deletes a product by ID, returning the number of rows removed.
///
/// Products still referenced by a cart line cannot be deleted.
pub async fn delete_product(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| match foreign_key_violation(&e) {
            Some(_) => Error::Conflict(format!(
                "Product {} is in one or more carts and cannot be deleted",
                id
            )),
            None => Error::Sqlx(e),
        })?
        .rows_affected();

    Ok(rows_affected)
}

/// Atomically takes `quantity` units out of stock.
///
/// The decrement only applies when enough stock is available; `None` means
/// the product is missing or has fewer than `quantity` units left.
pub async fn reserve_stock(
    conn: &mut DbConn,
    id: Uuid,
    quantity: i32,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<Postgres, Product>(&format!(
        r#"
        UPDATE products
        SET stock = stock - $2, updated_at = now()
        WHERE id = $1 AND stock >= $2
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(quantity)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Atomically returns `quantity` units to stock.
///
/// Fails with `Validation` when the result would not fit the stock column.
pub async fn release_stock(conn: &mut DbConn, id: Uuid, quantity: i32) -> Result<Product> {
    sqlx::query_as::<Postgres, Product>(&format!(
        r#"
        UPDATE products
        SET stock = stock + $2, updated_at = now()
        WHERE id = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(quantity)
    .fetch_optional(conn)
    .await
    .map_err(|e| {
        if out_of_range(&e) {
            Error::Validation(format!(
                "Cannot return {} units to product {}: stock would exceed the maximum",
                quantity, id
            ))
        } else {
            Error::Sqlx(e)
        }
    })?
    .ok_or_else(|| Error::NotFound(format!("Product with ID {} not found", id)))
}
