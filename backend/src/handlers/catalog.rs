//! Handlers for the product and category catalog.
//!
//! Reads are open to any authenticated user; writes require the admin
//! group, enforced by the router's middleware layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        catalog::{
            normalize_price, Category, CategoryCreate, CategoryUpdate, Product, ProductCreate,
            ProductResponse, ProductUpdate,
        },
        PageQuery, PaginatedResponse,
    },
    repositories::catalog as catalog_repo,
};

pub async fn list_products(
    State((pool, _config)): State<(PgPool, Config)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ProductResponse>>, AppError> {
    let total_items = catalog_repo::count_products(&pool).await?;
    if total_items == 0 {
        return Err(AppError::NotFound("No products found.".to_string()));
    }

    let products = catalog_repo::list_products(&pool, query.per_page(), query.offset()).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("No products found.".to_string()));
    }

    let items = products.into_iter().map(ProductResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        "/products/",
        &query,
        total_items,
    )))
}

pub async fn create_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<ProductCreate>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    payload.validate()?;

    let category = catalog_repo::find_category(&pool, payload.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;

    let product = Product {
        id: 0,
        name: payload.normalized_name(),
        description: payload.description,
        price: normalize_price(payload.price)?,
        stock: payload.stock,
        category_id: category.id,
        image_url: payload.image_url,
    };
    let product = catalog_repo::insert_product(&pool, &product).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            category,
        }),
    ))
}

pub async fn update_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(product_id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<ProductResponse>, AppError> {
    let mut product = catalog_repo::find_product(&pool, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    if let Some(category_id) = payload.category_id {
        catalog_repo::find_category(&pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;
    }

    product.apply_update(payload)?;
    catalog_repo::update_product(&pool, &product).await?;

    let updated = catalog_repo::find_product_with_category(&pool, product.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    Ok(Json(ProductResponse::from(updated)))
}

pub async fn delete_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    catalog_repo::find_product(&pool, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    catalog_repo::delete_product(&pool, product_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(
    State((pool, _config)): State<(PgPool, Config)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<Category>>, AppError> {
    let total_items = catalog_repo::count_categories(&pool).await?;
    if total_items == 0 {
        return Err(AppError::NotFound("No categories found.".to_string()));
    }

    let categories =
        catalog_repo::list_categories(&pool, query.per_page(), query.offset()).await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("No categories found.".to_string()));
    }

    Ok(Json(PaginatedResponse::new(
        categories,
        "/category/",
        &query,
        total_items,
    )))
}

pub async fn create_category(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    payload.validate()?;

    let category =
        catalog_repo::insert_category(&pool, &payload.name, payload.description.as_deref())
            .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<Category>, AppError> {
    let mut category = catalog_repo::find_category(&pool, category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;

    category.apply_update(payload)?;
    catalog_repo::update_category(&pool, &category).await?;

    Ok(Json(category))
}

pub async fn delete_category(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    catalog_repo::find_category(&pool, category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;

    catalog_repo::delete_category(&pool, category_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
