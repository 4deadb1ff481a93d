use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        products::{Category, NewProduct, Product, UpdateProduct},
        requests::CreateProductRequest,
    },
    queries::products,
    validation::{
        validate_initial_stock, validate_price, validate_product_name, validate_required_string,
        validate_stock_level,
    },
};
use strum::IntoEnumIterator;
use uuid::Uuid;

/// Every catalog category, in declaration order.
pub fn list_categories() -> Vec<Category> {
    Category::iter().collect()
}

/// Parses a category path segment, case-insensitively
///
/// # Errors
/// * `Validation` - the value is not one of the known categories; the
///   message lists the valid ones
pub fn parse_category(value: &str) -> Result<Category> {
    value.trim().parse::<Category>().map_err(|_| {
        let valid = list_categories()
            .iter()
            .map(Category::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Error::Validation(format!(
            "Invalid category '{}'. Valid categories are: {}",
            value, valid
        ))
    })
}

/// Creates a catalog product
///
/// # Errors
/// * `Validation` - a product with the same name exists, or price/stock are
///   not positive, or name/description are empty
pub async fn create_product(conn: &mut DbConn, request: CreateProductRequest) -> Result<Product> {
    let name = validate_product_name(&request.name)?;
    let description = validate_required_string(&request.description, "Product description")?;
    validate_price(request.price)?;
    validate_initial_stock(request.stock)?;

    if let Some(existing) = products::get_product_by_name(conn, &name).await? {
        return Err(Error::Validation(format!(
            "A product named \"{}\" already exists (product ID: {})",
            name, existing.id
        )));
    }

    let product = products::create_product(
        conn,
        NewProduct {
            name,
            description,
            price: request.price,
            stock: request.stock,
            category: request.category.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(
        product_id = %product.id,
        name = %product.name,
        stock = product.stock,
        "[Products] Service: Created product"
    );

    Ok(product)
}

pub async fn list_products(conn: &mut DbConn) -> Result<Vec<Product>> {
    products::list_products(conn).await
}

/// Gets a product by ID
///
/// # Errors
/// * `NotFound` - no product has this ID
pub async fn get_product(conn: &mut DbConn, id: Uuid) -> Result<Product> {
    products::get_product_by_id(conn, id)
        .await?
        .ok_or_else(|| product_not_found(id))
}

pub async fn list_products_by_category(conn: &mut DbConn, category: &str) -> Result<Vec<Product>> {
    let category = parse_category(category)?;
    products::list_products_by_category(conn, category).await
}

/// Applies a partial update to a product
///
/// Only provided fields are validated and changed. Renaming onto another
/// product's name is rejected with `Conflict` by the unique constraint.
///
/// # Errors
/// * `NotFound` - no product has this ID
/// * `Validation` - a provided field is out of range
/// * `Conflict` - the new name is already taken
pub async fn update_product(
    conn: &mut DbConn,
    id: Uuid,
    mut update: UpdateProduct,
) -> Result<Product> {
    if let Some(name) = update.name.as_deref() {
        update.name = Some(validate_product_name(name)?);
    }
    if let Some(description) = update.description.as_deref() {
        update.description = Some(validate_required_string(description, "Product description")?);
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(stock) = update.stock {
        validate_stock_level(stock)?;
    }

    if update.is_empty() {
        return get_product(conn, id).await;
    }

    let product = products::update_product(conn, id, update)
        .await?
        .ok_or_else(|| product_not_found(id))?;

    tracing::info!(
        product_id = %product.id,
        stock = product.stock,
        "[Products] Service: Updated product"
    );

    Ok(product)
}

/// Deletes a product
///
/// # Errors
/// * `NotFound` - no product has this ID
/// * `Conflict` - the product is still referenced by a cart line
pub async fn delete_product(conn: &mut DbConn, id: Uuid) -> Result<()> {
    if products::delete_product(conn, id).await? == 0 {
        return Err(product_not_found(id));
    }

    tracing::info!(product_id = %id, "[Products] Service: Deleted product");
    Ok(())
}

pub(crate) fn product_not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Product with ID {} not found", id))
}
