use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CHECKOUT_MESSAGE: &str = "Purchase completed successfully";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Cached `sum(quantity * price)` over the cart's lines.
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Product price captured when the line was first added.
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// A cart item joined with the product columns echoed back to clients.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub product_name: String,
    pub product_stock: i32,
    pub product_price: Decimal,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of `quantity * snapshot price` over `lines`.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
    pub product: CartProduct,
}

impl From<CartLine> for CartItemView {
    fn from(line: CartLine) -> Self {
        let subtotal = line.subtotal();
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
            subtotal,
            product: CartProduct {
                id: line.product_id,
                name: line.product_name,
                stock: line.product_stock,
                price: line.product_price,
            },
        }
    }
}

/// Cart with its lines, as returned by every cart endpoint except checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total: Decimal,
    pub items: Vec<CartItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartView {
    pub fn new(cart: Cart, lines: Vec<CartLine>) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            total: cart.total,
            items: lines.into_iter().map(CartItemView::from).collect(),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseItem {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub total: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub items: Vec<PurchaseItem>,
    pub message: String,
}

impl CheckoutSummary {
    pub fn from_lines(lines: &[CartLine], purchase_date: DateTime<Utc>) -> Self {
        let items = lines
            .iter()
            .map(|line| PurchaseItem {
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
                subtotal: line.subtotal(),
            })
            .collect();

        Self {
            total: cart_total(lines),
            purchase_date,
            items,
            message: CHECKOUT_MESSAGE.to_string(),
        }
    }
}
