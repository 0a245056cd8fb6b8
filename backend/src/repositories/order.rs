//! Repository functions for orders, including the cart-to-order conversion.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::error::AppError;
use crate::models::order::{Order, OrderItemWithProduct, OrderStatus};

const ORDER_COLUMNS: &str = "id, user_id, status, created_at, total_price";

/// Domain outcomes of converting a cart into an order.
#[derive(Debug, thiserror::Error)]
pub enum OrderConversionError {
    #[error("Cart is empty or not found.")]
    EmptyCart,
    #[error("Product ID {0} not found.")]
    ProductMissing(i64),
    #[error("Invalid quantity for product {0}.")]
    InvalidQuantity(i64),
    #[error("Total price must be greater than 0.")]
    NonPositiveTotal,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<OrderConversionError> for AppError {
    fn from(err: OrderConversionError) -> Self {
        match err {
            OrderConversionError::EmptyCart
            | OrderConversionError::InvalidQuantity(_)
            | OrderConversionError::NonPositiveTotal => AppError::BadRequest(err.to_string()),
            OrderConversionError::ProductMissing(_) => AppError::NotFound(err.to_string()),
            OrderConversionError::Database(db) => AppError::from(db),
        }
    }
}

/// Cart line joined against the product table; the product side is nullable
/// so a vanished product is detected instead of silently dropped.
#[derive(Debug, FromRow)]
struct ConversionLine {
    product_id: i64,
    quantity: i32,
    product_name: Option<String>,
    price: Option<Decimal>,
}

/// Atomically converts the user's cart into an order.
///
/// Loads the cart and its lines in one consistent read, snapshots each
/// product's price into `price_at_order_time`, persists the order and its
/// items, then tears the cart down (items before cart). Everything happens
/// inside one transaction: a failure at any step leaves the cart intact.
pub async fn place_order(
    pool: &PgPool,
    user_id: i64,
) -> Result<(Order, Vec<OrderItemWithProduct>), OrderConversionError> {
    let mut tx = pool.begin().await?;

    let cart_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM carts WHERE user_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(OrderConversionError::EmptyCart)?;

    let lines = sqlx::query_as::<_, ConversionLine>(
        "SELECT ci.product_id, ci.quantity, p.name AS product_name, p.price \
         FROM cart_items ci \
         LEFT JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 ORDER BY ci.id",
    )
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        return Err(OrderConversionError::EmptyCart);
    }

    let mut total_price = Decimal::ZERO;
    let mut snapshot = Vec::with_capacity(lines.len());
    for line in lines {
        let (name, price) = match (line.product_name, line.price) {
            (Some(name), Some(price)) => (name, price),
            _ => return Err(OrderConversionError::ProductMissing(line.product_id)),
        };
        if line.quantity <= 0 {
            return Err(OrderConversionError::InvalidQuantity(line.product_id));
        }
        total_price += price * Decimal::from(line.quantity);
        snapshot.push((line.product_id, line.quantity, price, name));
    }

    if total_price <= Decimal::ZERO {
        return Err(OrderConversionError::NonPositiveTotal);
    }

    let order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (user_id, status, total_price) VALUES ($1, $2, $3) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(OrderStatus::Processing)
    .bind(total_price)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(snapshot.len());
    for (product_id, quantity, price, product_name) in snapshot {
        let item_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO order_items (order_id, product_id, quantity, price_at_order_time) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(order.id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(&mut *tx)
        .await?;

        items.push(OrderItemWithProduct {
            id: item_id,
            order_id: order.id,
            product_id,
            quantity,
            price_at_order_time: price,
            product_name,
        });
    }

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM carts WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok((order, items))
}

pub async fn count_orders_by_user(pool: &PgPool, user_id: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_orders_by_user(
    pool: &PgPool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, AppError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
         ORDER BY id LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn list_items_with_products(
    pool: &PgPool,
    order_id: i64,
) -> Result<Vec<OrderItemWithProduct>, AppError> {
    let items = sqlx::query_as::<_, OrderItemWithProduct>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price_at_order_time, \
         p.name AS product_name \
         FROM order_items oi \
         JOIN products p ON p.id = oi.product_id \
         WHERE oi.order_id = $1 ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Deletes an order belonging to the user; items first, then the order
/// row, as one committed unit. Returns false when no such order exists
/// for that user.
pub async fn delete_order(pool: &PgPool, order_id: i64, user_id: i64) -> Result<bool, AppError> {
    let owned = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM orders WHERE id = $1 AND user_id = $2",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if owned.is_none() {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(true)
}
