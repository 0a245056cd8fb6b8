//! Models for orders and their immutable line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Canceled,
    Closed,
}

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub total_price: Decimal,
}

/// Join row for an order item with its referenced product loaded.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemWithProduct {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_order_time: Decimal,
    pub product_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    /// Price snapshot taken at conversion time; later product price
    /// changes never affect it.
    pub price_at_order_time: Decimal,
}

impl From<OrderItemWithProduct> for OrderItemResponse {
    fn from(row: OrderItemWithProduct) -> Self {
        OrderItemResponse {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price_at_order_time: row.price_at_order_time,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub total_price: Decimal,
    pub order_items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItemWithProduct>) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            created_at: order.created_at,
            total_price: order.total_price,
            order_items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Canceled);
    }
}
