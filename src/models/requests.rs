use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::products::Category;

/// HTTP API request for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    /// Defaults to `OTHER` when omitted
    #[serde(default)]
    pub category: Option<Category>,
}

/// HTTP API request for adding a product to the caller's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// HTTP API request for changing a cart line's quantity (0 removes the line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemQuantityRequest {
    pub quantity: i32,
}
