//! Handlers for shopping carts and their items.
//!
//! Every mutation checks existence before ownership, so probing another
//! user's resources yields 404 for unknown ids and 403 for known ones.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    middleware::CurrentUser,
    models::{
        cart::{CartCreate, CartItemCreate, CartItemResponse, CartItemUpdate, CartResponse},
        PageQuery, PaginatedResponse,
    },
    repositories::{cart as cart_repo, catalog as catalog_repo},
};

pub async fn list_carts(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<CartResponse>>, AppError> {
    let total_items = cart_repo::count_carts_by_user(&pool, current.user.id).await?;
    if total_items == 0 {
        return Err(AppError::NotFound("No carts found.".to_string()));
    }

    let carts =
        cart_repo::list_carts_by_user(&pool, current.user.id, query.per_page(), query.offset())
            .await?;
    if carts.is_empty() {
        return Err(AppError::NotFound("No carts found.".to_string()));
    }

    let mut items = Vec::with_capacity(carts.len());
    for cart in carts {
        let cart_items = cart_repo::list_items_with_products(&pool, cart.id).await?;
        items.push(CartResponse::new(cart, cart_items));
    }

    Ok(Json(PaginatedResponse::new(
        items,
        "/cart/",
        &query,
        total_items,
    )))
}

pub async fn create_cart(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CartCreate>,
) -> Result<(StatusCode, Json<CartResponse>), AppError> {
    payload.validate()?;

    let requested: Vec<(i64, i32)> = payload
        .cart_items
        .iter()
        .map(|item| (item.product_id, item.quantity))
        .collect();

    let cart = cart_repo::create_cart_with_items(&pool, current.user.id, &requested).await?;
    let items = cart_repo::list_items_with_products(&pool, cart.id).await?;

    Ok((StatusCode::CREATED, Json(CartResponse::new(cart, items))))
}

pub async fn delete_cart(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Path(cart_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let cart = cart_repo::find_cart(&pool, cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found.".to_string()))?;

    if cart.user_id != current.user.id {
        return Err(AppError::Forbidden(
            "Not authorized to delete this cart.".to_string(),
        ));
    }

    cart_repo::delete_cart(&pool, cart.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Adds a product to the caller's cart. A product already present in the
/// cart has its quantity incremented instead of gaining a second row.
pub async fn add_cart_item(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CartItemCreate>,
) -> Result<(StatusCode, Json<CartItemResponse>), AppError> {
    payload.validate()?;

    let cart = cart_repo::find_cart_by_user(&pool, current.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found for current user.".to_string()))?;

    catalog_repo::find_product(&pool, payload.product_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Product ID {} not found.", payload.product_id))
        })?;

    let item = cart_repo::upsert_item(&pool, cart.id, payload.product_id, payload.quantity).await?;

    Ok((StatusCode::CREATED, Json(CartItemResponse::from(item))))
}

pub async fn update_cart_item(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
    Json(payload): Json<CartItemUpdate>,
) -> Result<Json<CartItemResponse>, AppError> {
    payload.validate()?;

    let item = cart_repo::find_item(&pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;

    let cart = cart_repo::find_cart(&pool, item.cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;
    if cart.user_id != current.user.id {
        return Err(AppError::Forbidden(
            "Not authorized to update this item.".to_string(),
        ));
    }

    let item = cart_repo::update_item_quantity(&pool, item.id, payload.quantity).await?;

    Ok(Json(CartItemResponse::from(item)))
}

pub async fn delete_cart_item(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let item = cart_repo::find_item(&pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;

    let cart = cart_repo::find_cart(&pool, item.cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;
    if cart.user_id != current.user.id {
        return Err(AppError::Forbidden(
            "Not authorized to delete this item.".to_string(),
        ));
    }

    cart_repo::delete_item(&pool, item.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
