//! Repository functions for user accounts and group lookup rows.

use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::user::{NewUser, User, UserGroup, UserGroupName};

const USER_COLUMNS: &str =
    "id, email, hashed_password, is_active, group_id, created_at, updated_at";

/// Idempotent startup seed: ensure a lookup row exists for each group.
pub async fn ensure_user_groups(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("INSERT INTO user_groups (name) VALUES ($1), ($2) ON CONFLICT (name) DO NOTHING")
        .bind(UserGroupName::User)
        .bind(UserGroupName::Admin)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_group_by_name(
    pool: &PgPool,
    name: UserGroupName,
) -> Result<Option<UserGroup>, AppError> {
    let group = sqlx::query_as::<_, UserGroup>("SELECT id, name FROM user_groups WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(group)
}

pub async fn find_group_name(
    pool: &PgPool,
    group_id: i64,
) -> Result<Option<UserGroupName>, AppError> {
    let name = sqlx::query_scalar::<_, UserGroupName>("SELECT name FROM user_groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(pool)
        .await?;
    Ok(name)
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Inserts a new account; active by default per the registration policy.
/// The unique index on email backs the duplicate check under races.
pub async fn insert_user(
    pool: &PgPool,
    new_user: &NewUser,
    is_active: bool,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, hashed_password, is_active, group_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&new_user.email)
    .bind(new_user.hashed_password())
    .bind(is_active)
    .bind(new_user.group_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|err| {
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::Conflict(format!(
                "A user with this email {} already exists.",
                new_user.email
            ))
        } else {
            AppError::from(err)
        }
    })?;
    Ok(user)
}
