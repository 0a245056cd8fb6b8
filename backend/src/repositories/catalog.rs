//! Repository functions for categories and products.
//!
//! Deletes run as ordered statements inside one transaction, children
//! before parents, since the schema does not cascade.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::catalog::{Category, Product, ProductWithCategory};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category_id, image_url";
const PRODUCT_JOIN_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.stock, p.image_url, \
     p.category_id, c.name AS category_name, c.description AS category_description";

pub async fn count_categories(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_categories(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_category(pool: &PgPool, category_id: i64) -> Result<Option<Category>, AppError> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

pub async fn insert_category(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Category, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description) VALUES ($1, $2) \
         RETURNING id, name, description",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation("Category with this name already exists."))?;
    Ok(category)
}

pub async fn update_category(pool: &PgPool, category: &Category) -> Result<(), AppError> {
    sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.id)
        .execute(pool)
        .await
        .map_err(map_unique_violation("Category with this name already exists."))?;
    Ok(())
}

/// Removes a category and its products in one transaction: cart items for
/// those products first, then the products, then the category row.
pub async fn delete_category(pool: &PgPool, category_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM cart_items WHERE product_id IN \
         (SELECT id FROM products WHERE category_id = $1)",
    )
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM products WHERE category_id = $1")
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(map_fk_violation(
            "Category has products referenced by existing orders.",
        ))?;

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn count_products(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_products(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductWithCategory>, AppError> {
    let products = sqlx::query_as::<_, ProductWithCategory>(&format!(
        "SELECT {PRODUCT_JOIN_COLUMNS} FROM products p \
         JOIN categories c ON c.id = p.category_id \
         ORDER BY p.id LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_product(pool: &PgPool, product_id: i64) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn find_product_with_category(
    pool: &PgPool,
    product_id: i64,
) -> Result<Option<ProductWithCategory>, AppError> {
    let product = sqlx::query_as::<_, ProductWithCategory>(&format!(
        "SELECT {PRODUCT_JOIN_COLUMNS} FROM products p \
         JOIN categories c ON c.id = p.category_id \
         WHERE p.id = $1"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn insert_product(pool: &PgPool, product: &Product) -> Result<Product, AppError> {
    let inserted = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, description, price, stock, category_id, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(product.category_id)
    .bind(&product.image_url)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation("Product with this name already exists."))?;
    Ok(inserted)
}

pub async fn update_product(pool: &PgPool, product: &Product) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE products SET name = $1, description = $2, price = $3, stock = $4, \
         category_id = $5, image_url = $6 WHERE id = $7",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(product.category_id)
    .bind(&product.image_url)
    .bind(product.id)
    .execute(pool)
    .await
    .map_err(map_unique_violation("Product with this name already exists."))?;
    Ok(())
}

/// Removes a product and its cart references as one unit. A product pinned
/// by existing order items is reported as a conflict instead.
pub async fn delete_product(pool: &PgPool, product_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cart_items WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(map_fk_violation(
            "Product is referenced by existing orders.",
        ))?;

    tx.commit().await?;
    Ok(())
}

fn map_unique_violation(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |err| {
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::BadRequest(message.to_string())
        } else {
            AppError::from(err)
        }
    }
}

fn map_fk_violation(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |err| {
        if err
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation())
        {
            AppError::Conflict(message.to_string())
        } else {
            AppError::from(err)
        }
    }
}
