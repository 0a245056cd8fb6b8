//! Repository functions for carts and cart items.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::cart::{Cart, CartItem, CartItemWithProduct};

const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity";
const ITEM_JOIN_COLUMNS: &str = "ci.id, ci.cart_id, ci.product_id, ci.quantity, \
     p.name AS product_name, p.price AS product_price";

pub async fn find_cart_by_user(pool: &PgPool, user_id: i64) -> Result<Option<Cart>, AppError> {
    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, user_id FROM carts WHERE user_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(cart)
}

pub async fn find_cart(pool: &PgPool, cart_id: i64) -> Result<Option<Cart>, AppError> {
    let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id FROM carts WHERE id = $1")
        .bind(cart_id)
        .fetch_optional(pool)
        .await?;
    Ok(cart)
}

pub async fn count_carts_by_user(pool: &PgPool, user_id: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_carts_by_user(
    pool: &PgPool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Cart>, AppError> {
    let carts = sqlx::query_as::<_, Cart>(
        "SELECT id, user_id FROM carts WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(carts)
}

pub async fn list_items_with_products(
    pool: &PgPool,
    cart_id: i64,
) -> Result<Vec<CartItemWithProduct>, AppError> {
    let items = sqlx::query_as::<_, CartItemWithProduct>(&format!(
        "SELECT {ITEM_JOIN_COLUMNS} FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 ORDER BY ci.id"
    ))
    .bind(cart_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Creates a cart with its initial items in one transaction; every product
/// reference is checked inside the same unit so a bad id rolls the whole
/// cart back.
pub async fn create_cart_with_items(
    pool: &PgPool,
    user_id: i64,
    items: &[(i64, i32)],
) -> Result<Cart, AppError> {
    let mut tx = pool.begin().await?;

    let cart = sqlx::query_as::<_, Cart>(
        "INSERT INTO carts (user_id) VALUES ($1) RETURNING id, user_id",
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    for (product_id, quantity) in items {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            tx.rollback().await?;
            return Err(AppError::BadRequest(format!(
                "Product ID {} not found",
                product_id
            )));
        }

        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart.id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(cart)
}

/// Adds a product to a cart; a duplicate product increments the existing
/// row's quantity instead of inserting a second row.
pub async fn upsert_item(
    pool: &PgPool,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<CartItem, AppError> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
         ON CONFLICT (cart_id, product_id) \
         DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn find_item(pool: &PgPool, item_id: i64) -> Result<Option<CartItem>, AppError> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM cart_items WHERE id = $1"
    ))
    .bind(item_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn update_item_quantity(
    pool: &PgPool,
    item_id: i64,
    quantity: i32,
) -> Result<CartItem, AppError> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "UPDATE cart_items SET quantity = $1 WHERE id = $2 RETURNING {ITEM_COLUMNS}"
    ))
    .bind(quantity)
    .bind(item_id)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn delete_item(pool: &PgPool, item_id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes a cart and its items, children first, as one unit.
pub async fn delete_cart(pool: &PgPool, cart_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM carts WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
