//! Models for carts and cart items.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartItemCreate {
    pub product_id: i64,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartItemUpdate {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for creating a cart together with its initial items.
pub struct CartCreate {
    #[validate(nested)]
    pub cart_items: Vec<CartItemCreate>,
}

/// Join row for a cart item with its referenced product.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemWithProduct {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub product_name: String,
    pub product_price: rust_decimal::Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            id: item.id,
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Cart item as rendered inside a cart detail, with product context.
pub struct CartItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_price: rust_decimal::Decimal,
    pub quantity: i32,
}

impl From<CartItemWithProduct> for CartItemDetail {
    fn from(row: CartItemWithProduct) -> Self {
        CartItemDetail {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_price: row.product_price,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub id: i64,
    pub user_id: i64,
    pub cart_items: Vec<CartItemDetail>,
}

impl CartResponse {
    pub fn new(cart: Cart, items: Vec<CartItemWithProduct>) -> Self {
        CartResponse {
            id: cart.id,
            user_id: cart.user_id,
            cart_items: items.into_iter().map(CartItemDetail::from).collect(),
        }
    }
}
