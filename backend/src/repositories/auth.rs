//! Repository functions for stored refresh tokens.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::error::AppError;

#[derive(Debug, FromRow)]
pub struct StoredRefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn insert_refresh_token(
    pool: &PgPool,
    user_id: i64,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_refresh_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<StoredRefreshToken>, AppError> {
    let record = sqlx::query_as::<_, StoredRefreshToken>(
        "SELECT id, user_id, token, expires_at FROM refresh_tokens WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Housekeeping for tokens past their natural expiry.
pub async fn delete_expired_refresh_tokens(pool: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
