//! Handlers for orders and the cart-to-order conversion.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    middleware::CurrentUser,
    models::{order::OrderResponse, PageQuery, PaginatedResponse},
    repositories::order as order_repo,
};

pub async fn list_orders(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<OrderResponse>>, AppError> {
    let total_items = order_repo::count_orders_by_user(&pool, current.user.id).await?;
    if total_items == 0 {
        return Err(AppError::NotFound("No orders found.".to_string()));
    }

    let orders =
        order_repo::list_orders_by_user(&pool, current.user.id, query.per_page(), query.offset())
            .await?;
    if orders.is_empty() {
        return Err(AppError::NotFound("No orders found.".to_string()));
    }

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        let order_items = order_repo::list_items_with_products(&pool, order.id).await?;
        items.push(OrderResponse::new(order, order_items));
    }

    Ok(Json(PaginatedResponse::new(
        items,
        "/orders/",
        &query,
        total_items,
    )))
}

/// Converts the caller's cart into an order. The conversion is atomic;
/// on success the cart no longer exists.
pub async fn create_order(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let (order, items) = order_repo::place_order(&pool, current.user.id).await?;
    tracing::info!(order_id = order.id, user_id = current.user.id, "order placed");

    Ok((StatusCode::CREATED, Json(OrderResponse::new(order, items))))
}

pub async fn delete_order(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(current): Extension<CurrentUser>,
    Path(order_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = order_repo::delete_order(&pool, order_id, current.user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
