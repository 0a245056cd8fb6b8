use std::sync::OnceLock;

use rust_decimal::Decimal;
use storefront_backend::repositories::{
    cart as cart_repo,
    order::{self as order_repo, OrderConversionError},
};
use tokio::sync::Mutex;

#[path = "support/mod.rs"]
mod support;

async fn integration_guard() -> tokio::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().await
}

fn price(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

#[tokio::test]
async fn order_items_keep_price_at_conversion_time() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let category = support::seed_category(&pool).await;
    let product = support::seed_product(&pool, category, price("10.50")).await;
    cart_repo::create_cart_with_items(&pool, user.id, &[(product, 2)])
        .await
        .expect("create cart");

    let (order, items) = order_repo::place_order(&pool, user.id)
        .await
        .expect("place order");
    assert_eq!(order.total_price, price("21.00"));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price_at_order_time, price("10.50"));

    sqlx::query("UPDATE products SET price = $1 WHERE id = $2")
        .bind(price("99.99"))
        .bind(product)
        .execute(&pool)
        .await
        .expect("reprice product");

    let items = order_repo::list_items_with_products(&pool, order.id)
        .await
        .expect("reload items");
    assert_eq!(items[0].price_at_order_time, price("10.50"));

    let orders = order_repo::list_orders_by_user(&pool, user.id, 10, 0)
        .await
        .expect("reload orders");
    assert_eq!(orders[0].total_price, price("21.00"));
}

#[tokio::test]
async fn successful_conversion_consumes_the_cart() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let category = support::seed_category(&pool).await;
    let product = support::seed_product(&pool, category, price("4.00")).await;
    cart_repo::create_cart_with_items(&pool, user.id, &[(product, 3)])
        .await
        .expect("create cart");

    order_repo::place_order(&pool, user.id)
        .await
        .expect("place order");

    let carts = cart_repo::count_carts_by_user(&pool, user.id)
        .await
        .expect("count carts");
    assert_eq!(carts, 0);
}

#[tokio::test]
async fn conversion_without_a_cart_reports_empty_cart() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let err = order_repo::place_order(&pool, user.id)
        .await
        .expect_err("no cart must not convert");
    assert!(matches!(err, OrderConversionError::EmptyCart));
}

#[tokio::test]
async fn zero_total_rejection_leaves_cart_untouched() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let category = support::seed_category(&pool).await;
    // Below the API's price floor; inserted directly to exercise the guard.
    let product = support::seed_product(&pool, category, price("0.00")).await;
    let cart = cart_repo::create_cart_with_items(&pool, user.id, &[(product, 2)])
        .await
        .expect("create cart");

    let err = order_repo::place_order(&pool, user.id)
        .await
        .expect_err("zero total must not convert");
    assert!(matches!(err, OrderConversionError::NonPositiveTotal));

    let items = cart_repo::list_items_with_products(&pool, cart.id)
        .await
        .expect("cart still readable");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

#[tokio::test]
async fn failed_order_insert_leaves_cart_untouched() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let category = support::seed_category(&pool).await;
    // Total overflows the orders.total_price column, so the insert itself
    // fails after the cart was loaded.
    let product = support::seed_product(&pool, category, price("99999999.99")).await;
    let cart = cart_repo::create_cart_with_items(&pool, user.id, &[(product, 2_000_000)])
        .await
        .expect("create cart");

    let err = order_repo::place_order(&pool, user.id)
        .await
        .expect_err("overflowing total must not convert");
    assert!(matches!(err, OrderConversionError::Database(_)));

    let orders = order_repo::count_orders_by_user(&pool, user.id)
        .await
        .expect("count orders");
    assert_eq!(orders, 0);

    let items = cart_repo::list_items_with_products(&pool, cart.id)
        .await
        .expect("cart still readable");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2_000_000);
}
