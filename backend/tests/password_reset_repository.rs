use std::sync::OnceLock;

use chrono::{Duration, Utc};
use storefront_backend::repositories::{password_reset as reset_repo, user as user_repo};
use tokio::sync::Mutex;

#[path = "support/mod.rs"]
mod support;

async fn integration_guard() -> tokio::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().await
}

#[tokio::test]
async fn second_request_supersedes_first_token() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let expires_at = Utc::now() + Duration::hours(1);

    let first = reset_repo::replace_reset_token(&pool, user.id, "token-one", expires_at)
        .await
        .expect("issue first token");
    let second = reset_repo::replace_reset_token(&pool, user.id, "token-two", expires_at)
        .await
        .expect("issue second token");
    assert_ne!(first.id, second.id);

    let tokens = sqlx::query_scalar::<_, String>(
        "SELECT token FROM password_reset_tokens WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .expect("read tokens");
    assert_eq!(tokens, vec!["token-two".to_string()]);
}

#[tokio::test]
async fn completing_reset_rehashes_and_purges_tokens() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;

    let user = support::seed_user(&pool).await;
    let expires_at = Utc::now() + Duration::hours(1);
    reset_repo::replace_reset_token(&pool, user.id, "token-live", expires_at)
        .await
        .expect("issue token");

    let mut user = user_repo::find_user_by_email(&pool, &user.email)
        .await
        .expect("load user")
        .expect("user exists");
    user.set_password("N3w!Passw0rd").expect("rehash");
    reset_repo::complete_password_reset(&pool, &user)
        .await
        .expect("complete reset");

    let remaining = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .expect("count tokens");
    assert_eq!(remaining, 0);

    let reloaded = user_repo::find_user_by_email(&pool, &user.email)
        .await
        .expect("reload user")
        .expect("user exists");
    assert!(reloaded.verify_password("N3w!Passw0rd").expect("verify"));
    assert!(!reloaded
        .verify_password(support::SEED_PASSWORD)
        .expect("verify old"));
}
