use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use storefront_backend::{
    config::Config,
    db::connection::create_pool,
    docs::ApiDoc,
    handlers,
    middleware as auth_middleware,
    repositories::{auth as auth_repo, user as user_repo},
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        secret_key_access = %mask_secret(&config.secret_key_access),
        secret_key_refresh = %mask_secret(&config.secret_key_refresh),
        access_token_expire_minutes = config.access_token_expire_minutes,
        refresh_token_expire_days = config.refresh_token_expire_days,
        reset_token_expire_hours = config.reset_token_expire_hours,
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    user_repo::ensure_user_groups(&pool).await?;
    let purged = auth_repo::delete_expired_refresh_tokens(&pool).await?;
    if purged > 0 {
        tracing::info!("Deleted {} expired refresh tokens", purged);
    }

    // Public routes (no auth)
    let public_routes = Router::new()
        .route(
            "/api/v1/accounts/register/",
            post(handlers::accounts::register),
        )
        .route("/api/v1/accounts/login/", post(handlers::accounts::login))
        .route(
            "/api/v1/accounts/refresh/",
            post(handlers::accounts::refresh),
        )
        .route(
            "/api/v1/accounts/password-reset/request/",
            post(handlers::accounts::password_reset_request),
        )
        .route(
            "/api/v1/accounts/password-reset/complete/",
            post(handlers::accounts::password_reset_complete),
        );

    // Routes for any authenticated user
    let user_routes = Router::new()
        .route("/api/v1/products/", get(handlers::catalog::list_products))
        .route("/api/v1/category/", get(handlers::catalog::list_categories))
        .route(
            "/api/v1/cart/",
            get(handlers::cart::list_carts).post(handlers::cart::create_cart),
        )
        .route("/api/v1/cart/{cart_id}", delete(handlers::cart::delete_cart))
        .route("/api/v1/cart/items/", post(handlers::cart::add_cart_item))
        .route(
            "/api/v1/cart/items/{item_id}",
            put(handlers::cart::update_cart_item).delete(handlers::cart::delete_cart_item),
        )
        .route(
            "/api/v1/orders/",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/api/v1/orders/{order_id}/",
            delete(handlers::orders::delete_order),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            (pool.clone(), config.clone()),
            auth_middleware::auth,
        ));

    // Catalog write routes (auth + admin group)
    let admin_routes = Router::new()
        .route("/api/v1/products/", post(handlers::catalog::create_product))
        .route(
            "/api/v1/products/{product_id}",
            put(handlers::catalog::update_product).delete(handlers::catalog::delete_product),
        )
        .route("/api/v1/category/", post(handlers::catalog::create_category))
        .route(
            "/api/v1/category/{category_id}",
            axum::routing::patch(handlers::catalog::update_category)
                .delete(handlers::catalog::delete_category),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            (pool.clone(), config.clone()),
            auth_middleware::auth_admin,
        ));

    // Compose app with shared layers (CORS/Trace) and shared state
    let app = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::PATCH,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state((pool, config));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
