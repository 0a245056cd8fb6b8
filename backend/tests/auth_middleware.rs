//! Bearer authentication layer behavior for protected routes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use storefront_backend::utils::jwt::Claims;

mod support;

use support::{lazy_pool, protected_router, test_config};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn get_orders(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/api/v1/orders/");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_bearer_header_is_unauthorized() {
    let app = protected_router(lazy_pool(), test_config());

    let response = app.oneshot(get_orders(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Could not validate credentials");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = protected_router(lazy_pool(), test_config());

    let response = app.oneshot(get_orders(Some("not.a.jwt"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Could not validate credentials");
}

#[tokio::test]
async fn expired_token_reports_expiry_distinctly() {
    let config = test_config();
    let app = protected_router(lazy_pool(), config.clone());

    let claims = Claims::new(
        1,
        "shopper@example.com".to_string(),
        None,
        chrono::Duration::seconds(-60),
    );
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret_key_access.as_bytes()),
    )
    .unwrap();

    let response = app.oneshot(get_orders(Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Token has expired.");
}

#[tokio::test]
async fn refresh_token_is_rejected_on_access_routes() {
    let config = test_config();
    let app = protected_router(lazy_pool(), config.clone());

    let token =
        storefront_backend::utils::jwt::create_refresh_token(1, "shopper@example.com", &config)
            .unwrap();
    let response = app.oneshot(get_orders(Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Could not validate credentials");
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let app = protected_router(lazy_pool(), test_config());

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/orders/")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
