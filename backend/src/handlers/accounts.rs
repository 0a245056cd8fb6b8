//! Handlers for registration, login, token refresh, and password reset.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, MessageResponse, NewUser, PasswordResetCompleteRequest,
        PasswordResetRequest, RegisterRequest, TokenRefreshRequest, TokenRefreshResponse,
        UserGroupName, UserResponse,
    },
    repositories::{auth as auth_repo, password_reset as reset_repo, user as user_repo},
    utils::jwt::{self, TokenError},
};

const RESET_REQUESTED_MESSAGE: &str =
    "If you are registered, you will receive an email with instructions.";

/// Registers a new account in the default user group. Accounts are active
/// immediately; there is no separate activation step.
pub async fn register(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let group = user_repo::find_group_by_name(&pool, UserGroupName::User)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Default user group not found."))?;

    // Hashing is CPU-bound; keep it off the async runtime threads.
    let new_user = tokio::task::spawn_blocking(move || {
        NewUser::create(&payload.email, &payload.password, group.id)
    })
    .await
    .map_err(anyhow::Error::from)??;

    let user = user_repo::insert_user(&pool, &new_user, true).await?;
    tracing::info!(user_id = user.id, "registered new user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Authenticates a user and issues an access/refresh token pair. The
/// refresh token is persisted so it can be revoked server-side.
pub async fn login(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let user = user_repo::find_user_by_email(&pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let password = payload.password;
    let (user, password_matches) = tokio::task::spawn_blocking(move || {
        let matches = user.verify_password(&password);
        (user, matches)
    })
    .await
    .map_err(anyhow::Error::from)?;
    if !password_matches? {
        return Err(AppError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    if !user.is_active {
        return Err(AppError::Forbidden(
            "User account is not activated.".to_string(),
        ));
    }

    let access_token = jwt::create_access_token(user.id, &user.email, &config)?;
    let refresh_token = jwt::create_refresh_token(user.id, &user.email, &config)?;

    let expires_at = Utc::now() + Duration::days(config.refresh_token_expire_days);
    auth_repo::insert_refresh_token(&pool, user.id, &refresh_token, expires_at).await?;

    Ok(Json(LoginResponse::new(access_token, refresh_token)))
}

/// Issues a fresh access token against a valid stored refresh token. The
/// refresh token itself stays valid until it expires or is purged.
pub async fn refresh(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<TokenRefreshRequest>,
) -> Result<Json<TokenRefreshResponse>, AppError> {
    let claims = jwt::verify_refresh_token(&payload.refresh_token, &config).map_err(
        |err| match err {
            TokenError::Expired => AppError::BadRequest("Token has expired.".to_string()),
            TokenError::Invalid => AppError::BadRequest("Invalid refresh token.".to_string()),
        },
    )?;

    auth_repo::find_refresh_token(&pool, &payload.refresh_token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Refresh token not found.".to_string()))?;

    let user = user_repo::find_user_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let access_token = jwt::create_access_token(user.id, &user.email, &config)?;

    Ok(Json(TokenRefreshResponse::new(access_token)))
}

/// Requests a password reset token. The response never reveals whether
/// the address is registered; a new token silently replaces any prior one
/// for accounts that exist and are active.
pub async fn password_reset_request(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let user = match user_repo::find_user_by_email(&pool, &email).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE))),
    };

    let reset_token = jwt::create_password_reset_token(user.id, &user.email, &config)?;
    let expires_at = Utc::now() + Duration::hours(config.reset_token_expire_hours);
    let record = reset_repo::replace_reset_token(&pool, user.id, &reset_token, expires_at).await?;
    tracing::info!(
        user_id = user.id,
        token_id = record.id,
        "password reset token issued"
    );

    Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

/// Completes a password reset for an active account, replacing the stored
/// credential and purging any outstanding reset token.
pub async fn password_reset_complete(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<PasswordResetCompleteRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let user = user_repo::find_user_by_email(&pool, &email).await?;
    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            return Err(AppError::BadRequest(
                "Invalid user or inactive account.".to_string(),
            ))
        }
    };

    let password = payload.password;
    let user = tokio::task::spawn_blocking(move || {
        let mut user = user;
        user.set_password(&password)?;
        Ok::<_, AppError>(user)
    })
    .await
    .map_err(anyhow::Error::from)??;

    reset_repo::complete_password_reset(&pool, &user).await?;
    tracing::info!(user_id = user.id, "password reset completed");

    Ok(Json(MessageResponse::new(
        "Password has been successfully reset.",
    )))
}
