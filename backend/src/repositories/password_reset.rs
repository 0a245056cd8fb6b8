//! Repository functions for the password reset flow.
//!
//! A user owns at most one live reset token; issuing a new one supersedes
//! the previous inside the same transaction.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::error::AppError;
use crate::models::user::User;

#[derive(Debug, FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Deletes any prior token for the user and inserts the replacement as one
/// unit; either both happen or neither does.
pub async fn replace_reset_token(
    pool: &PgPool,
    user_id: i64,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<PasswordResetToken, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let record = sqlx::query_as::<_, PasswordResetToken>(
        "INSERT INTO password_reset_tokens (user_id, token, expires_at) \
         VALUES ($1, $2, $3) \
         RETURNING id, user_id, token, expires_at",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

/// Persists the already-rehashed credential and purges any outstanding
/// reset token for the user, committing both together.
pub async fn complete_password_reset(pool: &PgPool, user: &User) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE users SET hashed_password = $1, updated_at = $2 WHERE id = $3")
        .bind(user.hashed_password())
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
